use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("username already exists")]
    Conflict,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::Forbidden(_) => 1003,
            AuthError::Unauthorized => 1004,
            AuthError::HashError(_) => 1101,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for AuthError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
        }
    }
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => AuthError::Validation(msg),
            ServiceError::Model(m) => m.into(),
            ServiceError::Conflict(_) => AuthError::Conflict,
            ServiceError::Unauthorized(_) => AuthError::Unauthorized,
            ServiceError::Forbidden(msg) => AuthError::Forbidden(msg),
            other => AuthError::Repository(other.to_string()),
        }
    }
}
