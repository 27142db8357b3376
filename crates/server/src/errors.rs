use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::{auth::errors::AuthError, errors::ServiceError};
use thiserror::Error;
use tracing::{debug, error};

/// Error returned by every handler; rendered as `{"error": ..., "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, error: error.into(), detail }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.into()))
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = ?self.detail, "request failed");
        } else {
            debug!(status = %self.status, detail = ?self.detail, "request rejected");
        }
        let body = serde_json::json!({ "error": self.error, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let (status, title) = match &e {
            ServiceError::Validation(_) | ServiceError::Model(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            ServiceError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ServiceError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };
        Self::new(status, title, Some(e.to_string()))
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let (status, title) = match &e {
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            AuthError::Conflict => (StatusCode::CONFLICT, "Conflict"),
            AuthError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::HashError(_) | AuthError::Repository(_) => {
                error!(code = e.code(), err = %e, "auth failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        Self::new(status, title, Some(e.to_string()))
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(e: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
