use std::sync::Arc;

use configs::StorageConfig;
use models::{post::Post, user::User};
use service::{auth::AuthService, posts::PostService, storage::JsonCollectionStore};
use tracing::info;

pub type UserStore = JsonCollectionStore<User>;
pub type PostStore = JsonCollectionStore<Post>;

/// Services shared by every handler; built once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<UserStore>>,
    pub posts: Arc<PostService<PostStore>>,
}

impl ServerState {
    /// Open both collections under the configured data directory.
    pub async fn open(storage: &StorageConfig) -> anyhow::Result<Self> {
        let users = UserStore::new(storage.users_path()).await?;
        let posts = PostStore::new(storage.posts_path()).await?;
        info!(users = %users.path().display(), posts = %posts.path().display(), "collections opened");
        Ok(Self {
            auth: Arc::new(AuthService::new(users)),
            posts: Arc::new(PostService::new(posts)),
        })
    }
}
