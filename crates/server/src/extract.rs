//! Request extractors: bearer-token users, JSON bodies and path ids that
//! reject with [`JsonApiError`] instead of axum's plain-text defaults.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Json,
};
use axum::extract::rejection::JsonRejection;
use models::user::User;
use tracing::warn;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Token from `Authorization`, given either as `Bearer <token>` or bare.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };
    (!token.is_empty()).then_some(token)
}

/// Authenticated caller; requests without a valid token get 401.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!(path = %parts.uri.path(), "missing Authorization header");
            JsonApiError::unauthorized("missing bearer token")
        })?;
        let user = state.auth.authenticate(token).await?;
        Ok(Self(user))
    }
}

/// Caller if a valid token was supplied; an absent or unknown token is `None`.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<ServerState> for MaybeUser {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(&parts.headers) {
            Some(token) => state.auth.authenticate(token).await.ok(),
            None => None,
        };
        Ok(Self(user))
    }
}

/// JSON body whose decode errors become 400 responses.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Numeric `:id` path segment.
pub struct PostId(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<u64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
