//! Domain layer - Core account entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user record, its update patch and merge policy, and the password
//! hashing module.

pub mod constants;
pub mod error;
pub mod password;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{create_password_hash, verify_password_hash, PasswordCredential};
pub use user::{Address, AddressKind, NewUser, OrderRef, User, UserPatch, UserResponse};
