//! Domain-level constants.
//!
//! These constants define business rules and credential formats.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "User";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "Admin";

// =============================================================================
// Credentials
// =============================================================================

/// Length of a stored password hash (HMAC-SHA-512 output)
pub const PASSWORD_HASH_LENGTH: usize = 64;

/// Length of a stored password salt (the HMAC key)
pub const PASSWORD_SALT_LENGTH: usize = 128;

// =============================================================================
// Authentication
// =============================================================================

/// Session token lifetime in days
pub const TOKEN_EXPIRATION_DAYS: i64 = 7;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per day (for token expiration calculation)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
