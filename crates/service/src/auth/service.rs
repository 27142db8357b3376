use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use models::{next_id, user::{PublicUser, Role, User}};
use rand::rngs::OsRng;
use tracing::{info, debug, warn, instrument};

use super::domain::{AuthSession, LoginInput, NewAccount, RegisterInput};
use super::errors::AuthError;
use super::tokens::TokenRegistry;
use crate::errors::ServiceError;
use crate::storage::RecordStore;

/// Account and session service independent of web framework
pub struct AuthService<S: RecordStore<User>> {
    users: Arc<S>,
    tokens: TokenRegistry,
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

impl<S: RecordStore<User>> AuthService<S> {
    pub fn new(users: Arc<S>) -> Self { Self { users, tokens: TokenRegistry::new() } }

    /// Register a new account. Creating a moderator requires a moderator `caller`.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, domain::RegisterInput};
    /// use service::storage::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()));
    /// let input = RegisterInput { username: "alice".into(), password: "pw".into(), role: None };
    /// let user = tokio_test::block_on(svc.register(input, None)).unwrap();
    /// assert_eq!(user.username, "alice");
    /// assert_eq!(user.id, 1);
    /// ```
    #[instrument(skip(self, input, caller), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput, caller: Option<&User>) -> Result<User, AuthError> {
        let account = input.validate()?;
        if account.role == Role::Moderator && !caller.is_some_and(User::is_moderator) {
            return Err(AuthError::Forbidden("only moderators can create moderator accounts".into()));
        }
        let user = self.create_account(account).await?;
        info!(user_id = user.id, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, domain::{RegisterInput, LoginInput}};
    /// use service::storage::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "u".into(), password: "pw".into(), role: None }, None));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "u".into(), password: "pw".into() })).unwrap();
    /// let user = tokio_test::block_on(svc.authenticate(&session.token)).unwrap();
    /// assert_eq!(user.username, "u");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let username = input.validate()?;
        let user = self.users
            .load()
            .await?
            .into_iter()
            .find(|u| u.username == username)
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            debug!(user_id = user.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(user.id);
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession { token, user: user.into() })
    }

    /// Resolve a bearer token to its current user record.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.tokens.resolve(token).ok_or(AuthError::Unauthorized)?;
        self.users
            .load()
            .await?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or(AuthError::Unauthorized)
    }

    /// All accounts without password hashes, in registration order.
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AuthError> {
        Ok(self.users.load().await?.iter().map(PublicUser::from).collect())
    }

    /// Create the bootstrap moderator unless it already exists. A regular
    /// account holding the name is a conflict.
    #[instrument(skip(self, password))]
    pub async fn ensure_moderator(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let account = RegisterInput {
            username: username.to_string(),
            password: password.to_string(),
            role: Some(Role::Moderator.as_str().to_string()),
        }
        .validate()?;

        if let Some(existing) = self.users.load().await?.into_iter().find(|u| u.username == account.username) {
            if !existing.is_moderator() {
                warn!(user_id = existing.id, "bootstrap moderator name is held by a regular user");
                return Err(AuthError::Conflict);
            }
            return Ok(existing);
        }
        let user = self.create_account(account).await?;
        info!(user_id = user.id, "bootstrap_moderator_created");
        Ok(user)
    }

    async fn create_account(&self, account: NewAccount) -> Result<User, AuthError> {
        if self.users.load().await?.iter().any(|u| u.username == account.username) {
            debug!("user exists: {}", account.username);
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(&account.password)?;
        let NewAccount { username, role, .. } = account;
        let user = self.users
            .update(move |users| {
                if users.iter().any(|u| u.username == username) {
                    return Err(ServiceError::Conflict(format!("username {username} taken")));
                }
                let user = User { id: next_id(users.iter().map(|u| u.id)), username, password_hash, role };
                users.push(user.clone());
                Ok(user)
            })
            .await?;
        Ok(user)
    }
}
