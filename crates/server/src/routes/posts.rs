use axum::{extract::State, http::StatusCode, Json};
use models::post::{Comment, Post};
use service::posts::domain::{CommentInput, CreatePostInput, UpdatePostInput, VoteTally};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, CurrentUser, PostId};
use crate::state::ServerState;

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Post>>, JsonApiError> {
    Ok(Json(state.posts.list().await?))
}

pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<CreatePostInput>,
) -> Result<(StatusCode, Json<Post>), JsonApiError> {
    let post = state.posts.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get(State(state): State<ServerState>, PostId(id): PostId) -> Result<Json<Post>, JsonApiError> {
    Ok(Json(state.posts.get(id).await?))
}

/// Author or moderator only.
pub async fn update(
    State(state): State<ServerState>,
    PostId(id): PostId,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<UpdatePostInput>,
) -> Result<Json<Post>, JsonApiError> {
    Ok(Json(state.posts.update(&user, id, input).await?))
}

/// Author or moderator only.
pub async fn delete(
    State(state): State<ServerState>,
    PostId(id): PostId,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, JsonApiError> {
    state.posts.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upvote(State(state): State<ServerState>, PostId(id): PostId) -> Result<Json<VoteTally>, JsonApiError> {
    Ok(Json(state.posts.upvote(id).await?))
}

pub async fn downvote(State(state): State<ServerState>, PostId(id): PostId) -> Result<Json<VoteTally>, JsonApiError> {
    Ok(Json(state.posts.downvote(id).await?))
}

pub async fn add_comment(
    State(state): State<ServerState>,
    PostId(id): PostId,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<CommentInput>,
) -> Result<(StatusCode, Json<Comment>), JsonApiError> {
    let comment = state.posts.add_comment(&user, id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
