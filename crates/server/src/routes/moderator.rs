use axum::{extract::{Request, State}, middleware::Next, response::Response, Extension, Json};
use models::{post::Post, user::{PublicUser, User}};
use tracing::{info, warn};

use crate::errors::JsonApiError;
use crate::extract::bearer_token;
use crate::state::ServerState;

/// Middleware for `/moderator/*`: 401 without a valid token, 403 for
/// non-moderators. The resolved user is stored in request extensions.
pub async fn require_moderator(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let token = bearer_token(req.headers())
        .map(str::to_owned)
        .ok_or_else(|| JsonApiError::unauthorized("missing bearer token"))?;
    let user = state.auth.authenticate(&token).await?;
    if !user.is_moderator() {
        warn!(user_id = user.id, path = %req.uri().path(), "moderator route denied");
        return Err(JsonApiError::forbidden("moderator access required"));
    }
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub async fn list_users(
    State(state): State<ServerState>,
    Extension(moderator): Extension<User>,
) -> Result<Json<Vec<PublicUser>>, JsonApiError> {
    let users = state.auth.list_users().await?;
    info!(moderator_id = moderator.id, count = users.len(), "moderator listed users");
    Ok(Json(users))
}

pub async fn list_posts(
    State(state): State<ServerState>,
    Extension(moderator): Extension<User>,
) -> Result<Json<Vec<Post>>, JsonApiError> {
    let posts = state.posts.list().await?;
    info!(moderator_id = moderator.id, count = posts.len(), "moderator listed posts");
    Ok(Json(posts))
}
