//! Password credential value object - Domain layer password handling.
//!
//! A credential is an HMAC-SHA-512 digest of the UTF-8 password, keyed with a
//! per-credential random key. The key doubles as the salt and is stored next
//! to the digest, so the two halves are always created and replaced together.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

use crate::constants::{PASSWORD_HASH_LENGTH, PASSWORD_SALT_LENGTH};
use crate::error::{DomainError, DomainResult};

type HmacSha512 = Hmac<Sha512>;

/// Stored password credential: digest plus the key it was computed with.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    hash: Vec<u8>,
    salt: Vec<u8>,
}

// Don't expose credential bytes in debug output
impl std::fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("hash", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl PasswordCredential {
    /// Hash a plain text password under a freshly generated salt.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the password is empty or whitespace only.
    pub fn create(plain_text: &str) -> DomainResult<Self> {
        ensure_password(plain_text)?;

        let mut salt = vec![0u8; PASSWORD_SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt);

        let hash = keyed_mac(&salt, plain_text)?.finalize().into_bytes().to_vec();
        Ok(Self { hash, salt })
    }

    /// Rebuild a credential from stored bytes.
    ///
    /// # Errors
    /// Returns `InvalidInput` if either half has the wrong length.
    pub fn from_parts(hash: Vec<u8>, salt: Vec<u8>) -> DomainResult<Self> {
        ensure_lengths(&hash, &salt)?;
        Ok(Self { hash, salt })
    }

    /// Wrap bytes loaded from storage without checking them.
    ///
    /// Lengths are checked when the credential is verified, so a corrupted
    /// row still loads and fails at verification time.
    pub fn from_stored(hash: Vec<u8>, salt: Vec<u8>) -> Self {
        Self { hash, salt }
    }

    /// A well-formed credential that matches no password.
    ///
    /// Used to keep the cost of a failed lookup equal to a failed verify.
    pub fn placeholder() -> Self {
        Self {
            hash: vec![0u8; PASSWORD_HASH_LENGTH],
            salt: vec![0u8; PASSWORD_SALT_LENGTH],
        }
    }

    /// Stored digest bytes.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Stored salt bytes.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Consume and return `(hash, salt)` for storage.
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.hash, self.salt)
    }

    /// Verify a plain text password against this credential.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the password is blank.
    pub fn verify(&self, plain_text: &str) -> DomainResult<bool> {
        verify_password_hash(plain_text, &self.hash, &self.salt)
    }
}

/// Hash a password, returning `(hash, salt)`.
pub fn create_password_hash(plain_text: &str) -> DomainResult<(Vec<u8>, Vec<u8>)> {
    PasswordCredential::create(plain_text).map(PasswordCredential::into_parts)
}

/// Recompute the keyed hash with `stored_salt` and compare it to `stored_hash`.
///
/// The comparison runs over the full digest in constant time.
///
/// # Errors
/// Returns `InvalidInput` for a blank password or when the stored values are
/// not 64 / 128 bytes long. A wrong password is `Ok(false)`, never an error.
pub fn verify_password_hash(
    plain_text: &str,
    stored_hash: &[u8],
    stored_salt: &[u8],
) -> DomainResult<bool> {
    ensure_password(plain_text)?;
    ensure_lengths(stored_hash, stored_salt)?;

    Ok(keyed_mac(stored_salt, plain_text)?
        .verify_slice(stored_hash)
        .is_ok())
}

fn keyed_mac(key: &[u8], plain_text: &str) -> DomainResult<HmacSha512> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| DomainError::internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(plain_text.as_bytes());
    Ok(mac)
}

fn ensure_password(plain_text: &str) -> DomainResult<()> {
    if plain_text.trim().is_empty() {
        return Err(DomainError::invalid_input("Password must not be empty"));
    }
    Ok(())
}

fn ensure_lengths(hash: &[u8], salt: &[u8]) -> DomainResult<()> {
    if hash.len() != PASSWORD_HASH_LENGTH {
        return Err(DomainError::invalid_input(format!(
            "Invalid length of password hash ({} bytes expected)",
            PASSWORD_HASH_LENGTH
        )));
    }
    if salt.len() != PASSWORD_SALT_LENGTH {
        return Err(DomainError::invalid_input(format!(
            "Invalid length of password salt ({} bytes expected)",
            PASSWORD_SALT_LENGTH
        )));
    }
    Ok(())
}
