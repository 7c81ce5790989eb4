//! User repository over the `users` table.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::user::{self, into_users, to_active_model, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{Address, NewUser, OrderRef, PasswordCredential, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A user ready to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub credential: PasswordCredential,
    pub addresses: Vec<Address>,
    pub orders: Vec<OrderRef>,
}

impl NewUserRecord {
    /// Combine creation data with a freshly computed credential
    pub fn new(user: NewUser, credential: PasswordCredential) -> Self {
        let role = user.effective_role();
        Self {
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role,
            credential,
            addresses: user.addresses,
            orders: user.orders,
        }
    }

    /// Materialize the record under an assigned id
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            credential: self.credential,
            addresses: self.addresses,
            orders: self.orders,
        }
    }
}

/// User repository trait for dependency injection.
///
/// Lookups return `None` when nothing matches; absence is not an error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user, assigning its id
    async fn insert(&self, record: NewUserRecord) -> AppResult<User>;

    /// Replace the stored user with the given id
    async fn replace_by_id(&self, id: Uuid, user: User) -> AppResult<User>;

    /// Delete user by ID, returning whether a record was removed
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        into_users(models)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn insert(&self, record: NewUserRecord) -> AppResult<User> {
        let active_model = to_active_model(record.into_user(Uuid::new_v4()))?;

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(user_id = %model.id, "Inserted user");
        User::try_from(model)
    }

    async fn replace_by_id(&self, id: Uuid, user: User) -> AppResult<User> {
        let mut active_model = to_active_model(user)?;
        active_model.id = Set(id);

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AppError::NotFound,
            other => AppError::from(other),
        })?;
        User::try_from(model)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
