//! In-process user repository.
//!
//! Keeps records in insertion order behind an async lock. Enforces the same
//! email uniqueness the database index does, so it can stand in for
//! [`UserStore`](super::UserStore) in tests and local tooling.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::user_repository::{NewUserRecord, UserRepository};
use common::{AppError, AppResult};
use domain::User;

/// In-memory implementation of UserRepository
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, record: NewUserRecord) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == record.email) {
            return Err(AppError::conflict("Email"));
        }

        let user = record.into_user(Uuid::new_v4());
        users.push(user.clone());
        Ok(user)
    }

    async fn replace_by_id(&self, id: Uuid, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id != id && u.email == user.email) {
            return Err(AppError::conflict("Email"));
        }

        let slot = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)?;
        user.id = id;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}
