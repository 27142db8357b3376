use std::sync::Arc;

use chrono::Utc;
use models::{next_id, post::{Comment, Post}, user::User};
use tracing::{info, instrument};

use super::domain::{CommentInput, CreatePostInput, UpdatePostInput, Vote, VoteTally};
use super::policy::can_modify;
use crate::errors::ServiceError;
use crate::storage::RecordStore;

/// Application service for posts. Authorization decisions use
/// [`can_modify`]; the caller is expected to have authenticated the user.
pub struct PostService<S: RecordStore<Post>> {
    posts: Arc<S>,
}

fn position(posts: &[Post], id: u64) -> Result<usize, ServiceError> {
    posts.iter().position(|p| p.id == id).ok_or_else(|| ServiceError::not_found("post"))
}

impl<S: RecordStore<Post>> PostService<S> {
    pub fn new(posts: Arc<S>) -> Self { Self { posts } }

    /// Publish a new post authored by `author`.
    ///
    /// # Examples
    /// ```
    /// use service::posts::{PostService, domain::CreatePostInput};
    /// use service::storage::MemoryStore;
    /// use models::user::{Role, User};
    /// use std::sync::Arc;
    /// let svc = PostService::new(Arc::new(MemoryStore::default()));
    /// let author = User { id: 1, username: "alice".into(), password_hash: String::new(), role: Role::User };
    /// let post = tokio_test::block_on(svc.create(&author, CreatePostInput { title: "Hi".into(), content: "World".into() })).unwrap();
    /// assert_eq!(post.upvotes, 0);
    /// assert!(post.comments.is_empty());
    /// ```
    #[instrument(skip(self, author, input), fields(author_id = author.id))]
    pub async fn create(&self, author: &User, input: CreatePostInput) -> Result<Post, ServiceError> {
        input.validate()?;
        let author_id = author.id;
        let post = self.posts
            .update(move |posts| {
                let post = Post::new(next_id(posts.iter().map(|p| p.id)), author_id, input.title, input.content);
                posts.push(post.clone());
                Ok(post)
            })
            .await?;
        info!(post_id = post.id, "post_created");
        Ok(post)
    }

    pub async fn list(&self) -> Result<Vec<Post>, ServiceError> {
        self.posts.load().await
    }

    pub async fn get(&self, id: u64) -> Result<Post, ServiceError> {
        self.posts
            .load()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found("post"))
    }

    /// Edit title and/or content. Only the author or a moderator may edit;
    /// the original author is kept either way.
    #[instrument(skip(self, user, input), fields(user_id = user.id))]
    pub async fn update(&self, user: &User, id: u64, input: UpdatePostInput) -> Result<Post, ServiceError> {
        input.validate()?;
        let post = self.posts
            .update(|posts| {
                let idx = position(posts, id)?;
                let post = &mut posts[idx];
                if !can_modify(user, post) {
                    return Err(ServiceError::Forbidden("only the author or a moderator may edit this post".into()));
                }
                input.apply(post);
                Ok(post.clone())
            })
            .await?;
        info!(post_id = id, "post_updated");
        Ok(post)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn delete(&self, user: &User, id: u64) -> Result<(), ServiceError> {
        self.posts
            .update(|posts| {
                let idx = position(posts, id)?;
                if !can_modify(user, &posts[idx]) {
                    return Err(ServiceError::Forbidden("only the author or a moderator may delete this post".into()));
                }
                posts.remove(idx);
                Ok(())
            })
            .await?;
        info!(post_id = id, "post_deleted");
        Ok(())
    }

    /// Anonymous vote; repeated votes all count.
    pub async fn vote(&self, id: u64, vote: Vote) -> Result<VoteTally, ServiceError> {
        self.posts
            .update(|posts| {
                let idx = position(posts, id)?;
                let post = &mut posts[idx];
                match vote {
                    Vote::Up => post.upvotes = post.upvotes.saturating_add(1),
                    Vote::Down => post.downvotes = post.downvotes.saturating_add(1),
                }
                Ok(VoteTally::from(&*post))
            })
            .await
    }

    pub async fn upvote(&self, id: u64) -> Result<VoteTally, ServiceError> {
        self.vote(id, Vote::Up).await
    }

    pub async fn downvote(&self, id: u64) -> Result<VoteTally, ServiceError> {
        self.vote(id, Vote::Down).await
    }

    #[instrument(skip(self, author, input), fields(author_id = author.id))]
    pub async fn add_comment(&self, author: &User, id: u64, input: CommentInput) -> Result<Comment, ServiceError> {
        input.validate()?;
        let author_id = author.id;
        let comment = self.posts
            .update(move |posts| {
                let idx = position(posts, id)?;
                let post = &mut posts[idx];
                let comment = Comment {
                    id: next_id(post.comments.iter().map(|c| c.id)),
                    author_id,
                    content: input.content,
                    created_at: Utc::now(),
                };
                post.comments.push(comment.clone());
                Ok(comment)
            })
            .await?;
        info!(post_id = id, comment_id = comment.id, "comment_added");
        Ok(comment)
    }

    /// Posts whose title or content contains `query`, ignoring case,
    /// in insertion order.
    pub async fn search(&self, query: &str) -> Result<Vec<Post>, ServiceError> {
        if query.trim().is_empty() {
            return Err(ServiceError::Validation("query parameter q is required".into()));
        }
        let needle = query.to_lowercase();
        Ok(self.posts.load().await?.into_iter().filter(|p| p.matches(&needle)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use models::user::Role;

    fn user(id: u64, role: Role) -> User {
        User { id, username: format!("user{id}"), password_hash: String::new(), role }
    }

    fn svc() -> PostService<MemoryStore<Post>> {
        PostService::new(Arc::new(MemoryStore::default()))
    }

    fn new_post(title: &str, content: &str) -> CreatePostInput {
        CreatePostInput { title: title.into(), content: content.into() }
    }

    #[tokio::test]
    async fn created_post_reads_back_clean() -> Result<(), anyhow::Error> {
        let svc = svc();
        let author = user(1, Role::User);
        let created = svc.create(&author, new_post("T", "C")).await?;
        let got = svc.get(created.id).await?;
        assert_eq!((got.upvotes, got.downvotes), (0, 0));
        assert!(got.comments.is_empty());
        assert_eq!(got.author_id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let svc = svc();
        assert!(matches!(svc.get(42).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.upvote(42).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(&user(1, Role::Moderator), 42).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn stranger_cannot_update_but_moderator_can() -> Result<(), anyhow::Error> {
        let svc = svc();
        let author = user(1, Role::User);
        let post = svc.create(&author, new_post("T", "C")).await?;

        let edit = UpdatePostInput { title: Some("changed".into()), content: None };
        let denied = svc.update(&user(2, Role::User), post.id, edit.clone()).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));
        assert_eq!(svc.get(post.id).await?.title, "T");

        let updated = svc.update(&user(3, Role::Moderator), post.id, edit).await?;
        assert_eq!(updated.title, "changed");
        assert_eq!(updated.author_id, author.id);
        Ok(())
    }

    #[tokio::test]
    async fn delete_follows_same_rule() -> Result<(), anyhow::Error> {
        let svc = svc();
        let author = user(1, Role::User);
        let a = svc.create(&author, new_post("a", "a")).await?;
        let b = svc.create(&author, new_post("b", "b")).await?;

        assert!(matches!(svc.delete(&user(2, Role::User), a.id).await, Err(ServiceError::Forbidden(_))));
        svc.delete(&author, a.id).await?;
        svc.delete(&user(9, Role::Moderator), b.id).await?;
        assert!(svc.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn votes_accumulate_without_dedup() -> Result<(), anyhow::Error> {
        let svc = svc();
        let post = svc.create(&user(1, Role::User), new_post("T", "C")).await?;
        svc.upvote(post.id).await?;
        let tally = svc.upvote(post.id).await?;
        assert_eq!(tally, VoteTally { upvotes: 2, downvotes: 0 });
        let tally = svc.downvote(post.id).await?;
        assert_eq!(tally, VoteTally { upvotes: 2, downvotes: 1 });
        Ok(())
    }

    #[tokio::test]
    async fn comments_append_in_order() -> Result<(), anyhow::Error> {
        let svc = svc();
        let post = svc.create(&user(1, Role::User), new_post("T", "C")).await?;
        let first = svc.add_comment(&user(2, Role::User), post.id, CommentInput { content: "one".into() }).await?;
        let second = svc.add_comment(&user(3, Role::User), post.id, CommentInput { content: "two".into() }).await?;
        assert_eq!((first.id, second.id), (1, 2));

        let got = svc.get(post.id).await?;
        let bodies: Vec<&str> = got.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two"]);
        assert_eq!(got.comments[1].author_id, 3);

        let blank = svc.add_comment(&user(2, Role::User), post.id, CommentInput::default()).await;
        assert!(blank.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_title_or_content() -> Result<(), anyhow::Error> {
        let svc = svc();
        let u = user(1, Role::User);
        let a = svc.create(&u, new_post("Hello there", "x")).await?;
        svc.create(&u, new_post("nothing", "to see")).await?;
        let c = svc.create(&u, new_post("other", "well HELLO again")).await?;

        let ids: Vec<u64> = svc.search("hello").await?.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert!(matches!(svc.search("  ").await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn search_keeps_surrounding_whitespace_in_query() -> Result<(), anyhow::Error> {
        let svc = svc();
        let u = user(1, Role::User);
        svc.create(&u, new_post("helloworld", "no gaps")).await?;
        let spaced = svc.create(&u, new_post("hello world", "with a gap")).await?;

        let ids: Vec<u64> = svc.search(" world").await?.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![spaced.id]);
        Ok(())
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() -> Result<(), anyhow::Error> {
        let svc = svc();
        let u = user(1, Role::User);
        for t in ["first", "second", "third"] {
            svc.create(&u, new_post(t, "c")).await?;
        }
        let titles: Vec<String> = svc.list().await?.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        Ok(())
    }
}
