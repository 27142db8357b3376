use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Account role. Moderators may edit or delete any post and see the user list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            other => Err(ModelError::Validation(format!("unknown role '{other}' (expected user or moderator)"))),
        }
    }
}

/// Persisted user record, including the password hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

/// User as exposed over the API; never carries the password hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self { id: u.id, username: u.username.clone(), role: u.role }
    }
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self { id: u.id, username: u.username, role: u.role }
    }
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.trim().is_empty() {
        return Err(ModelError::Validation("password required".into()));
    }
    Ok(())
}
