//! # webcastor-store
//!
//! Key/value storage for channel credentials.
//!
//! A [`CredentialStore`] maps channel identifiers to their stored credential
//! string. Two interchangeable backends are provided:
//!
//! - [`MemoryStore`]: in-process, lost on restart, never fails
//! - `RedisStore` (feature `redis-backend`): persisted in Redis
//!
//! The backend is picked once at startup by [`connect_store`], based on
//! whether a Redis URL is configured.
//!
//! ## Quick Start
//!
//! ```rust
//! use webcastor_store::{CredentialStore, MemoryStore};
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//!
//! store.set("channel-1", "open".to_string()).await.unwrap();
//! assert_eq!(store.get("channel-1").await.unwrap(), Some("open".to_string()));
//!
//! // Keys that were never written are absent
//! assert_eq!(store.get("channel-2").await.unwrap(), None);
//! # });
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub mod backends;
pub mod config;

pub use backends::*;
pub use config::*;

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Store configuration error: {0}")]
    Configuration(String),

    #[error("Timeout error")]
    Timeout,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Capability interface over a key/value credential mapping.
///
/// `set` overwrites on collision and enforces no uniqueness. `get` returns
/// `Ok(None)` for keys never written.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Fetch the value stored under `key`
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

}

/// Build the store selected by `config`.
///
/// A configured Redis URL selects the Redis backend, otherwise the volatile
/// memory backend is used. Failing to reach Redis is not an error here: the
/// Redis store logs the failure and starts disconnected.
pub async fn connect_store(config: &StoreConfig) -> StoreResult<Arc<dyn CredentialStore>> {
    match &config.redis_url {
        #[cfg(feature = "redis-backend")]
        Some(url) => {
            let redis_config = RedisConfig::builder()
                .url(url.clone())
                .key_prefix(config.key_prefix.clone())
                .connection_timeout(config.connection_timeout)
                .command_timeout(config.command_timeout)
                .build();
            let store = RedisStore::connect(redis_config).await?;
            info!("Using Redis credential store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis-backend"))]
        Some(_) => Err(StoreError::Configuration(
            "a Redis URL is configured but the redis-backend feature is disabled".to_string(),
        )),
        None => {
            info!("Using volatile in-memory credential store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_store_defaults_to_memory() {
        let store = connect_store(&StoreConfig::default()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");

        store.set("a", "open".to_string()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some("open".to_string()));
    }
}
