//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::ROLE_USER;
use crate::password::PasswordCredential;

/// Address purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Shipping,
    Billing,
}

/// Shipping or billing address attached to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub kind: AddressKind,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// Reference to an order placed by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRef {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
}

impl OrderRef {
    /// Reference an order placed now
    pub fn new(order_id: Uuid) -> Self {
        Self {
            order_id,
            placed_at: Utc::now(),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub credential: PasswordCredential,
    pub addresses: Vec<Address>,
    pub orders: Vec<OrderRef>,
}

impl User {
    /// Check if user has the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// Replace the stored credential (hash and salt together)
    pub fn set_credential(&mut self, credential: PasswordCredential) {
        self.credential = credential;
    }

    /// Merge a patch into this record.
    ///
    /// Scalar fields are overwritten only when the patch carries a non-blank
    /// value. Addresses are replaced when the patch has any; orders are
    /// appended. The id is never touched.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(email) = non_blank(patch.email) {
            self.email = email;
        }
        if let Some(first_name) = non_blank(patch.first_name) {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = non_blank(patch.last_name) {
            self.last_name = Some(last_name);
        }
        if let Some(role) = non_blank(patch.role) {
            self.role = role;
        }
        if !patch.addresses.is_empty() {
            self.addresses = patch.addresses;
        }
        self.orders.extend(patch.orders);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// User creation data (everything the store does not assign)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub orders: Vec<OrderRef>,
}

impl NewUser {
    /// New user with only an email set
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Role to persist, falling back to the default role when blank
    pub fn effective_role(&self) -> String {
        if self.role.trim().is_empty() {
            ROLE_USER.to_string()
        } else {
            self.role.clone()
        }
    }
}

/// User update patch. Absent or blank fields mean "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub orders: Vec<OrderRef>,
}

impl UserPatch {
    /// Empty patch for the given user id
    pub fn for_user(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Email the patch wants to move to, if it differs from `current`
    pub fn email_change<'a>(&'a self, current: &str) -> Option<&'a str> {
        self.email
            .as_deref()
            .filter(|email| !email.trim().is_empty() && *email != current)
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: String,
    pub addresses: Vec<Address>,
    pub orders: Vec<OrderRef>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            addresses: user.addresses,
            orders: user.orders,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse::from(user.clone())
    }
}
