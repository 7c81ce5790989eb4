//! Account service configuration.

use std::env;

use common::{AppError, AppResult, DatabaseConfig, JwtConfig};
use domain::MIN_JWT_SECRET_LENGTH;

/// Insecure signing secret used only in debug builds when none is set
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Session token settings
    pub jwt: JwtConfig,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables (and `.env`).
    ///
    /// # Errors
    /// Fails if `JWT_SECRET` is missing in a release build or shorter than
    /// the minimum length.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::invalid_input(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let defaults = DatabaseConfig::default();
        let config = Self {
            database: DatabaseConfig {
                url: env::var("ACCOUNT_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(defaults.min_connections),
            },
            jwt: JwtConfig { secret },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that cannot be expressed in the types.
    pub fn validate(&self) -> AppResult<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::invalid_input(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: DEV_JWT_SECRET.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AccountServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = AccountServiceConfig::default();
        config.jwt.secret = "too-short".to_string();

        assert!(matches!(config.validate(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_secret_at_minimum_length_accepted() {
        let mut config = AccountServiceConfig::default();
        config.jwt.secret = "x".repeat(MIN_JWT_SECRET_LENGTH);

        assert!(config.validate().is_ok());
    }
}
