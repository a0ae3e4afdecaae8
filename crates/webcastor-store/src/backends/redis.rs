//! Redis credential store

use crate::{CredentialStore, StoreError, StoreResult};
use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, Client, RedisResult};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL, e.g. `redis://:token@host:port`
    pub url: String,

    /// Connection timeout
    pub connection_timeout: Duration,

    /// Command timeout
    pub command_timeout: Duration,

    /// Key prefix for all channel keys
    pub key_prefix: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            connection_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(1),
            key_prefix: Some("webcastor:channel:".to_string()),
        }
    }
}

impl RedisConfig {
    pub fn builder() -> RedisConfigBuilder {
        RedisConfigBuilder::default()
    }
}

/// Redis configuration builder
#[derive(Debug, Default)]
pub struct RedisConfigBuilder {
    config: RedisConfig,
}

impl RedisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.url = url.into();
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    pub fn key_prefix<S: Into<String>>(mut self, prefix: Option<S>) -> Self {
        self.config.key_prefix = prefix.map(|p| p.into());
        self
    }

    pub fn build(self) -> RedisConfig {
        self.config
    }
}

/// Credential store persisted in Redis.
///
/// Holds the client and at most one multiplexed connection. The connection is
/// opened lazily and discarded after any failed command, so the next call
/// dials again. A single call never retries.
pub struct RedisStore {
    client: Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    config: RedisConfig,
}

impl RedisStore {
    /// Create the store and attempt a first connection.
    ///
    /// Only an unparseable URL is an error. A failed first connection is
    /// logged and retried on the next operation.
    pub async fn connect(config: RedisConfig) -> StoreResult<Self> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| StoreError::Configuration(format!("Invalid Redis URL: {}", e)))?;

        let store = Self {
            client,
            connection: Mutex::new(None),
            config,
        };

        if let Err(e) = store.connection().await {
            error!("Redis error encountered: {}", e);
        }

        Ok(store)
    }

    /// Whether a live connection is currently held
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Format key with optional prefix
    fn format_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Current connection, dialing Redis when none is held
    async fn connection(&self) -> StoreResult<MultiplexedConnection> {
        let mut slot = self.connection.lock().await;

        if let Some(connection) = slot.as_ref() {
            return Ok(connection.clone());
        }

        let connection = tokio::time::timeout(
            self.config.connection_timeout,
            self.client.get_multiplexed_tokio_connection(),
        )
        .await
        .map_err(|_| {
            StoreError::Unavailable(format!(
                "Redis connection timed out after {:?}",
                self.config.connection_timeout
            ))
        })?
        .map_err(|e| StoreError::Unavailable(format!("Redis connection failed: {}", e)))?;

        info!("Redis connection established");
        *slot = Some(connection.clone());
        Ok(connection)
    }

    /// Forget the held connection so the next call reconnects
    async fn discard_connection(&self) {
        if self.connection.lock().await.take().is_some() {
            warn!("Dropping Redis connection after a failed command");
        }
    }

    /// Run a command, bounded by the command timeout
    async fn with_connection<F, Fut, R>(&self, operation: F) -> StoreResult<R>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<R>>,
    {
        let connection = self.connection().await?;

        let result = match tokio::time::timeout(self.config.command_timeout, operation(connection)).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => StoreError::Backend(format!("Redis operation failed: {}", e)),
            Err(_) => StoreError::Timeout,
        };

        self.discard_connection().await;
        Err(result)
    }
}

#[async_trait]
impl CredentialStore for RedisStore {
    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let formatted_key = self.format_key(key);

        let result = self
            .with_connection(|mut conn| async move {
                conn.set::<String, String, ()>(formatted_key, value).await
            })
            .await;

        match result {
            Ok(()) => {
                debug!("Stored key: {}", key);
                Ok(())
            }
            Err(e) => {
                error!("Redis SET error for key '{}': {}", key, e);
                Err(e)
            }
        }
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let formatted_key = self.format_key(key);

        self.with_connection(|mut conn| async move {
            conn.get::<String, Option<String>>(formatted_key).await
        })
        .await
        .map_err(|e| {
            error!("Redis GET error for key '{}': {}", key, e);
            e
        })
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
