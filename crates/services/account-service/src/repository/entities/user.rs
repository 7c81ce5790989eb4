//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::{AppError, AppResult};
use domain::{PasswordCredential, User};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    /// Ordered address list, stored as a JSON array
    pub addresses: Json,
    /// Order references, stored as a JSON array
    pub orders: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(User {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role,
            credential: PasswordCredential::from_stored(model.password_hash, model.password_salt),
            addresses: serde_json::from_value(model.addresses)?,
            orders: serde_json::from_value(model.orders)?,
        })
    }
}

/// Build a fully-set active model from a domain entity
pub fn to_active_model(user: User) -> AppResult<ActiveModel> {
    let (password_hash, password_salt) = user.credential.into_parts();

    Ok(ActiveModel {
        id: Set(user.id),
        email: Set(user.email),
        first_name: Set(user.first_name),
        last_name: Set(user.last_name),
        role: Set(user.role),
        password_hash: Set(password_hash),
        password_salt: Set(password_salt),
        addresses: Set(serde_json::to_value(user.addresses)?),
        orders: Set(serde_json::to_value(user.orders)?),
    })
}

/// Convert a list of models, failing on the first undecodable row
pub fn into_users(models: Vec<Model>) -> AppResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Address, AddressKind, OrderRef};
    use sea_orm::ActiveValue;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "grace@example.com".to_string(),
            first_name: Some("Grace".to_string()),
            last_name: None,
            role: "User".to_string(),
            credential: PasswordCredential::create("navy-cobol").unwrap(),
            addresses: vec![Address {
                kind: AddressKind::Billing,
                line1: "2 Harbor Way".to_string(),
                line2: Some("Suite 5".to_string()),
                city: "Arlington".to_string(),
                state: Some("VA".to_string()),
                postal_code: "22201".to_string(),
                country: "US".to_string(),
            }],
            orders: vec![OrderRef::new(Uuid::new_v4())],
        }
    }

    #[test]
    fn test_active_model_carries_credential_and_json() {
        let user = sample_user();
        let active = to_active_model(user.clone()).unwrap();

        match active.password_hash {
            ActiveValue::Set(hash) => assert_eq!(hash, user.credential.hash()),
            _ => panic!("password_hash not set"),
        }
        match active.addresses {
            ActiveValue::Set(json) => assert!(json.is_array()),
            _ => panic!("addresses not set"),
        }
    }

    #[test]
    fn test_model_converts_to_user() {
        let user = sample_user();
        let (hash, salt) = user.credential.clone().into_parts();
        let model = Model {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: None,
            role: user.role.clone(),
            password_hash: hash,
            password_salt: salt,
            addresses: serde_json::to_value(&user.addresses).unwrap(),
            orders: serde_json::to_value(&user.orders).unwrap(),
        };

        assert_eq!(User::try_from(model).unwrap(), user);
    }

    #[test]
    fn test_undecodable_json_is_an_error() {
        let user = sample_user();
        let (hash, salt) = user.credential.into_parts();
        let model = Model {
            id: user.id,
            email: user.email,
            first_name: None,
            last_name: None,
            role: user.role,
            password_hash: hash,
            password_salt: salt,
            addresses: serde_json::json!({ "not": "a list" }),
            orders: serde_json::json!([]),
        };

        assert!(matches!(User::try_from(model), Err(AppError::Serialization(_))));
    }
}
