use models::user::{self, PublicUser, Role};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

/// Registration input. Fields default to empty so a missing field is
/// reported by `validate` rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Registration input after validation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl RegisterInput {
    pub fn validate(self) -> Result<NewAccount, AuthError> {
        user::validate_username(&self.username)?;
        user::validate_password(&self.password)?;
        let role = match self.role.as_deref() {
            None => Role::User,
            Some(r) => r.parse::<Role>()?,
        };
        Ok(NewAccount { username: self.username.trim().to_string(), password: self.password, role })
    }
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginInput {
    /// Checks both fields and returns the username in the trimmed form
    /// that registration stores.
    pub fn validate(&self) -> Result<&str, AuthError> {
        user::validate_username(&self.username)?;
        user::validate_password(&self.password)?;
        Ok(self.username.trim())
    }
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}
