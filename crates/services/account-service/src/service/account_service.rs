//! Account service - Authentication and account lifecycle.
//!
//! Orchestrates the password module, the token issuer and the user store.
//! The email uniqueness check is a separate read before the write; the
//! database unique index rejects whatever slips through concurrently.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{NewUser, PasswordCredential, User, UserPatch};

use super::token_issuer::{TokenIssuer, TokenResponse};
use crate::repository::{NewUserRecord, UserRepository};

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Check credentials. Every failure mode yields `None`.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>>;

    /// Authenticate and issue a bearer token
    async fn login(&self, email: &str, password: &str) -> AppResult<Option<TokenResponse>>;

    /// Sign a session token for the user
    fn issue_token(&self, user: &User) -> AppResult<String>;

    /// Create a user with the given password
    async fn create(&self, user: NewUser, password: &str) -> AppResult<User>;

    /// Merge a patch into an existing user, optionally replacing the password
    async fn update(&self, patch: UserPatch, password: Option<&str>) -> AppResult<User>;

    /// Delete a user; unknown ids are ignored
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List all users
    async fn get_all(&self) -> AppResult<Vec<User>>;

    /// Get user by ID
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Get user by email
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of AccountService using a repository.
pub struct AccountManager {
    repo: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
}

impl AccountManager {
    /// Create new account service instance
    pub fn new(repo: Arc<dyn UserRepository>, tokens: TokenIssuer) -> Self {
        Self { repo, tokens }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Ok(None);
        }

        let user = self.repo.find_by_email(email).await?;

        // SECURITY: verify against a placeholder when the email is unknown so
        // both failure paths cost one hash computation.
        let placeholder = PasswordCredential::placeholder();
        let stored = user.as_ref().map_or(&placeholder, |u| &u.credential);

        let password_valid = match stored.verify(password) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored credential rejected during authentication: {}", e);
                false
            }
        };

        match user {
            Some(user) if password_valid => Ok(Some(user)),
            _ => {
                tracing::debug!("Authentication failed");
                Ok(None)
            }
        }
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<Option<TokenResponse>> {
        match self.authenticate(email, password).await? {
            Some(user) => self.tokens.token_response(&user).map(Some),
            None => Ok(None),
        }
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        self.tokens.issue(user)
    }

    async fn create(&self, user: NewUser, password: &str) -> AppResult<User> {
        if user.email.trim().is_empty() {
            return Err(AppError::invalid_input("Email must not be empty"));
        }
        let credential = PasswordCredential::create(password)?;

        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let created = self
            .repo
            .insert(NewUserRecord::new(user, credential))
            .await?;
        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }

    async fn update(&self, patch: UserPatch, password: Option<&str>) -> AppResult<User> {
        let mut current = self.repo.find_by_id(patch.id).await?.ok_or_not_found()?;

        if let Some(new_email) = patch.email_change(&current.email) {
            if self.repo.find_by_email(new_email).await?.is_some() {
                return Err(AppError::conflict("Email"));
            }
        }

        let id = current.id;
        current.apply_patch(patch);

        if let Some(password) = password.filter(|p| !p.trim().is_empty()) {
            current.set_credential(PasswordCredential::create(password)?);
        }

        let updated = self.repo.replace_by_id(id, current).await?;
        tracing::info!(user_id = %id, "User updated");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.repo.delete_by_id(id).await? {
            tracing::info!(user_id = %id, "User deleted");
        } else {
            tracing::debug!(user_id = %id, "Delete skipped, no such user");
        }
        Ok(())
    }

    async fn get_all(&self) -> AppResult<Vec<User>> {
        self.repo.find_all().await
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }
}
