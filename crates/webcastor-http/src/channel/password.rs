//! Argon2id hashing of channel passwords

use argon2::password_hash::{self, rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Salted hash of a channel password, kept as a PHC string so the salt and
/// cost parameters are stored alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialHash(String);

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
    #[error("Failed to verify password: {0}")]
    Verify(String),
    #[error("Stored credential is not a PHC hash string")]
    Malformed,
}

impl CredentialHash {
    /// Hash `password` under a fresh random salt
    pub fn generate(password: &str) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Whether `attempt` is the password this hash was made from
    pub fn matches(&self, attempt: &str) -> Result<bool, PasswordError> {
        let parsed = password_hash::PasswordHash::new(&self.0).map_err(|_| PasswordError::Malformed)?;

        match Argon2::default().verify_password(attempt.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Verify(e.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a value read from the store; malformed values fail in `matches`
    pub(crate) fn from_stored(hash: String) -> Self {
        Self(hash)
    }
}
