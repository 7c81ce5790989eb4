//! Session token issuer.
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`) and role, valid for
//! seven days from issuance. There is no refresh or revocation; any holder
//! of the signing secret can verify a token on its own.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{User, SECONDS_PER_DAY, TOKEN_EXPIRATION_DAYS, TOKEN_TYPE_BEARER};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
}

/// Token response returned after successful login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenIssuer {
    /// Issuer signing with `secret`
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issuer built from shared JWT configuration
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.clone())
    }

    /// Sign a token for the given user.
    pub fn issue(&self, user: &User) -> AppResult<String> {
        let expires_at = Utc::now()
            .checked_add_signed(Duration::days(TOKEN_EXPIRATION_DAYS))
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

        let claims = Claims {
            sub: user.id,
            role: user.role.clone(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        tracing::debug!(user_id = %user.id, exp = claims.exp, "Issued session token");

        Ok(token)
    }

    /// Sign a token and wrap it in a bearer response.
    pub fn token_response(&self, user: &User) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: self.issue(user)?,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: TOKEN_EXPIRATION_DAYS * SECONDS_PER_DAY,
        })
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

/// Sign a seven-day token for `user` with `signing_secret`.
pub fn issue_token(user: &User, signing_secret: &str) -> AppResult<String> {
    TokenIssuer::new(signing_secret).issue(user)
}
