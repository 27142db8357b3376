use axum::{extract::State, http::StatusCode, Json};
use models::user::PublicUser;
use service::auth::domain::{AuthSession, LoginInput, RegisterInput};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, MaybeUser};
use crate::state::ServerState;

/// Open endpoint; a moderator token is needed only to create moderators.
pub async fn register(
    State(state): State<ServerState>,
    MaybeUser(caller): MaybeUser,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<PublicUser>), JsonApiError> {
    let user = state.auth.register(input, caller.as_ref()).await?;
    info!(user_id = user.id, "register ok");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<AuthSession>, JsonApiError> {
    let session = state.auth.login(input).await?;
    Ok(Json(session))
}
