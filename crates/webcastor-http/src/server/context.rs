//! Shared application state handed to every handler

use crate::channel::ChannelRegistry;
use crate::config::WebcastorConfig;
use crate::errors::{HttpError, HttpResult};
use crate::websocket::{BroadcastGroups, ConnectionGateway, MessageGuard};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use webcastor_store::{connect_store, CredentialStore};

/// Long-lived services of a running relay
#[derive(Clone)]
pub struct AppContext {
    config: Arc<WebcastorConfig>,
    registry: Arc<ChannelRegistry>,
    groups: Arc<BroadcastGroups>,
    gateway: ConnectionGateway,
    guard: MessageGuard,
    started_at: Instant,
}

impl AppContext {
    /// Connect the configured credential store and assemble the services
    pub async fn from_config(config: WebcastorConfig) -> HttpResult<Self> {
        let store = connect_store(&config.store)
            .await
            .map_err(|e| HttpError::startup(format!("Credential store setup failed: {}", e)))?;

        info!("Using {} credential store", store.backend_name());

        Ok(Self::with_store(config, store))
    }

    /// Assemble the services around an existing store
    pub fn with_store(config: WebcastorConfig, store: Arc<dyn CredentialStore>) -> Self {
        let registry = Arc::new(ChannelRegistry::new(store));
        let groups = Arc::new(BroadcastGroups::new());
        let gateway = ConnectionGateway::new(registry.clone(), groups.clone());
        let guard = MessageGuard::new(groups.clone(), config.message_size_limit);

        Self {
            config: Arc::new(config),
            registry,
            groups,
            gateway,
            guard,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &WebcastorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn groups(&self) -> &BroadcastGroups {
        &self.groups
    }

    pub fn gateway(&self) -> &ConnectionGateway {
        &self.gateway
    }

    pub fn guard(&self) -> &MessageGuard {
        &self.guard
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
