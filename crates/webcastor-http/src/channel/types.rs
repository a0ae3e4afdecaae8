//! Core types for broadcast channels

use super::password::{CredentialHash, PasswordError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use uuid::Uuid;

/// Stored credential of a channel that needs no password
pub const OPEN_CREDENTIAL: &str = "open";

/// Opaque channel identifier.
///
/// Generated ids are time-ordered UUIDs, but ids presented by clients are
/// arbitrary strings and are never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Mint a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a channel stores to authenticate broadcasters
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    /// No password required; any password attempt succeeds
    Open,
    /// Salted one-way hash of the channel password
    Hashed(CredentialHash),
}

impl Credential {
    /// Build the credential for a creation request; empty means open
    pub fn for_password(password: &str) -> Result<Self, PasswordError> {
        if password.is_empty() {
            Ok(Credential::Open)
        } else {
            Ok(Credential::Hashed(CredentialHash::generate(password)?))
        }
    }

    /// Decode a value read back from the credential store
    pub fn from_stored(value: String) -> Self {
        if value == OPEN_CREDENTIAL {
            Credential::Open
        } else {
            Credential::Hashed(CredentialHash::from_stored(value))
        }
    }

    /// Encode for the credential store
    pub fn as_stored(&self) -> &str {
        match self {
            Credential::Open => OPEN_CREDENTIAL,
            Credential::Hashed(hash) => hash.as_str(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Credential::Open)
    }

    /// Check a password attempt against this credential
    pub fn verify(&self, password: &str) -> bool {
        match self {
            Credential::Open => true,
            Credential::Hashed(hash) => match hash.matches(password) {
                Ok(valid) => valid,
                Err(e) => {
                    warn!("Unverifiable stored credential: {}", e);
                    false
                }
            },
        }
    }

    /// [`Credential::verify`] run on the blocking pool, off the async workers
    pub async fn authenticate(&self, password: &str) -> bool {
        if self.is_open() {
            return true;
        }

        let credential = self.clone();
        let password = password.to_string();
        match tokio::task::spawn_blocking(move || credential.verify(&password)).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Password verification task failed: {}", e);
                false
            }
        }
    }
}

/// A channel: its identifier and immutable credential
#[derive(Debug, Clone)]
pub struct Channel {
    pub id: ChannelId,
    pub credential: Credential,
}

impl Channel {
    /// Create a channel with a fresh identifier
    pub fn create(password: &str) -> Result<Self, PasswordError> {
        Ok(Self {
            id: ChannelId::generate(),
            credential: Credential::for_password(password)?,
        })
    }
}
