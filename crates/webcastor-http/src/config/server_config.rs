//! Relay server configuration
//!
//! Read from environment variables, falling back to [`WebcastorDefaults`].

use super::defaults::WebcastorDefaults;
use crate::logging::LogFormat;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use webcastor_core::{
    env_or_default, parse_env, read_env, AppConfigTrait, ConfigError, ConfigSource,
    ConfigValidator, Environment, PortValidator, UrlValidator,
};
use webcastor_store::StoreConfig;

/// Top-level configuration of the relay
#[derive(Debug, Clone)]
pub struct WebcastorConfig {
    pub host: String,
    pub port: u16,
    /// Largest relayed payload, in bytes of its JSON encoding
    pub message_size_limit: usize,
    /// Base of shareable URLs; derived from the `Host` header when unset
    pub public_url: Option<String>,
    pub health_check_path: String,
    pub shutdown_timeout: Duration,
    pub environment: Environment,
    pub log_level: String,
    pub log_format: LogFormat,
    pub store: StoreConfig,
}

impl Default for WebcastorConfig {
    fn default() -> Self {
        Self {
            host: WebcastorDefaults::HOST.to_string(),
            port: WebcastorDefaults::PORT,
            message_size_limit: WebcastorDefaults::MESSAGE_SIZE_LIMIT,
            public_url: None,
            health_check_path: WebcastorDefaults::HEALTH_CHECK_PATH.to_string(),
            shutdown_timeout: Duration::from_secs(WebcastorDefaults::SHUTDOWN_TIMEOUT_SECS),
            environment: Environment::default(),
            log_level: WebcastorDefaults::LOG_LEVEL.to_string(),
            log_format: LogFormat::Pretty,
            store: StoreConfig::default(),
        }
    }
}

impl WebcastorConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ConfigError::invalid_value("host", addr, "valid IP address"))
    }
}

impl AppConfigTrait for WebcastorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", WebcastorDefaults::HOST);
        let port = parse_env("PORT", WebcastorDefaults::PORT, "valid port number")?;

        let message_size_limit = parse_env(
            "MESSAGE_SIZE_LIMIT",
            WebcastorDefaults::MESSAGE_SIZE_LIMIT,
            "valid number of bytes",
        )?;

        let public_url = read_env("PUBLIC_URL");

        let health_check_path =
            env_or_default("HEALTH_CHECK_PATH", WebcastorDefaults::HEALTH_CHECK_PATH);

        let shutdown_timeout_secs = parse_env(
            "SHUTDOWN_TIMEOUT",
            WebcastorDefaults::SHUTDOWN_TIMEOUT_SECS,
            "valid number of seconds",
        )?;

        let environment = match read_env("APP_ENV") {
            Some(value) => value.parse::<Environment>()?,
            None => Environment::default(),
        };

        let log_level = env_or_default("LOG_LEVEL", WebcastorDefaults::LOG_LEVEL);
        let log_format: LogFormat =
            env_or_default("LOG_FORMAT", WebcastorDefaults::LOG_FORMAT).parse()?;

        Ok(Self {
            host,
            port,
            message_size_limit,
            public_url,
            health_check_path,
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
            environment,
            log_level,
            log_format,
            store: StoreConfig::from_env()?,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        PortValidator::default().validate(&self.port)?;
        self.socket_addr()?;

        if self.message_size_limit == 0 {
            return Err(ConfigError::validation_failed(
                "Message size limit must be greater than 0",
            ));
        }

        if let Some(url) = &self.public_url {
            UrlValidator::http("public_url").validate(url.as_str())?;
        }

        if self.health_check_path.is_empty() || !self.health_check_path.starts_with('/') {
            return Err(ConfigError::validation_failed(
                "Health check path must be non-empty and start with '/'",
            ));
        }

        if self.shutdown_timeout.is_zero() {
            return Err(ConfigError::validation_failed(
                "Shutdown timeout must be greater than 0",
            ));
        }

        self.store.validate()
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert(
            "host".to_string(),
            ConfigSource::env_or_default("HOST", WebcastorDefaults::HOST),
        );
        sources.insert(
            "port".to_string(),
            ConfigSource::env_or_default("PORT", WebcastorDefaults::PORT.to_string()),
        );
        sources.insert(
            "message_size_limit".to_string(),
            ConfigSource::env_or_default(
                "MESSAGE_SIZE_LIMIT",
                WebcastorDefaults::MESSAGE_SIZE_LIMIT.to_string(),
            ),
        );
        sources.insert(
            "public_url".to_string(),
            ConfigSource::env_or_default("PUBLIC_URL", "request host"),
        );
        sources.insert(
            "health_check_path".to_string(),
            ConfigSource::env_or_default("HEALTH_CHECK_PATH", WebcastorDefaults::HEALTH_CHECK_PATH),
        );
        sources.insert(
            "environment".to_string(),
            ConfigSource::env_or_default("APP_ENV", Environment::default().to_string()),
        );
        sources.insert(
            "log_level".to_string(),
            ConfigSource::env_or_default("LOG_LEVEL", WebcastorDefaults::LOG_LEVEL),
        );
        sources.insert(
            "log_format".to_string(),
            ConfigSource::env_or_default("LOG_FORMAT", WebcastorDefaults::LOG_FORMAT),
        );
        for (key, source) in self.store.config_sources() {
            sources.insert(format!("store.{}", key), source);
        }
        sources
    }
}
