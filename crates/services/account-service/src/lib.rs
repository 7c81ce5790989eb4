//! Account Service Library
//!
//! User accounts and authentication: salted password credentials, account
//! create/update/delete with merge-on-update semantics, and signed session
//! tokens. Transport layers call into [`service::AccountService`] and map
//! its error kinds onto their own responses.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::{AppError, AppResult};

use crate::config::AccountServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{AccountManager, TokenIssuer};

/// Connect to the database, apply pending migrations and build the service.
pub async fn connect_service(config: &AccountServiceConfig) -> AppResult<AccountManager> {
    let db = Database::connect(&config.database).await?;

    let user_repo = Arc::new(UserStore::new(db.get_connection()));
    let tokens = TokenIssuer::from_config(&config.jwt);

    Ok(AccountManager::new(user_repo, tokens))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction, config: &AccountServiceConfig) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
        MigrateAction::Ping => {
            db.ping()
                .await
                .map_err(|e| AppError::internal(format!("Database unreachable: {}", e)))?;
            info!("Database reachable");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
    Ping,
}
