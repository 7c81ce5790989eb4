//! Service layer - authentication, token issuance and account lifecycle.

mod account_service;
mod token_issuer;

pub use account_service::{AccountManager, AccountService};
pub use token_issuer::{issue_token, Claims, TokenIssuer, TokenResponse};
