//! Channel registry backed by a credential store

use super::password::PasswordError;
use super::types::{Channel, ChannelId, Credential};
use crate::errors::{ChannelError, ChannelResult};
use std::sync::Arc;
use tracing::{error, info};
use webcastor_store::CredentialStore;

/// Creates channels and resolves their credentials.
///
/// Credentials are written once at creation and never updated or evicted.
#[derive(Clone)]
pub struct ChannelRegistry {
    store: Arc<dyn CredentialStore>,
}

impl ChannelRegistry {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Create a channel protected by `password`; an empty password makes it open
    pub async fn create(&self, password: &str) -> ChannelResult<ChannelId> {
        let password = password.to_string();
        let channel = tokio::task::spawn_blocking(move || Channel::create(&password))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))??;

        self.store
            .set(channel.id.as_str(), channel.credential.as_stored().to_string())
            .await
            .map_err(|e| {
                error!("Failed to persist channel {}: {}", channel.id, e);
                ChannelError::from(e)
            })?;

        info!(
            channel = %channel.id,
            open = channel.credential.is_open(),
            "Created new channel"
        );

        Ok(channel.id)
    }

    /// Look up the credential of a channel; `None` when it was never created.
    ///
    /// Store failures are logged and reported as absent.
    pub async fn credential(&self, id: &ChannelId) -> Option<Credential> {
        match self.store.get(id.as_str()).await {
            Ok(value) => value.map(Credential::from_stored),
            Err(e) => {
                error!("Credential lookup failed for channel {}: {}", id, e);
                None
            }
        }
    }

    /// Name of the backing store, for diagnostics
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
