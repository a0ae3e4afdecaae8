//! # Structured Logging
//!
//! tracing-subscriber setup with JSON, pretty or plain output and an
//! `EnvFilter` that `RUST_LOG` overrides.

use crate::config::WebcastorConfig;
use serde_json::{json, Value};
use std::fmt;
use std::io;
use std::str::FromStr;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use webcastor_core::{ConfigError, Environment};

/// Output format of log records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Plain,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "plain" | "text" => Ok(LogFormat::Plain),
            _ => Err(ConfigError::invalid_value(
                "log_format",
                s,
                "json, pretty, or plain",
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    pub format: LogFormat,
    /// Include file and line number information
    pub include_location: bool,
    /// Custom fields logged once at initialization
    pub global_fields: serde_json::Map<String, Value>,
    /// Per-target directives applied on top of `level`, e.g. "tower_http=warn"
    pub env_filter: Option<String>,
    pub service_name: Option<String>,
    pub service_version: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            global_fields: serde_json::Map::new(),
            env_filter: None,
            service_name: None,
            service_version: None,
        }
    }
}

impl LoggingConfig {
    /// Create production logging configuration
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            include_location: false,
            global_fields: {
                let mut fields = serde_json::Map::new();
                fields.insert("env".to_string(), json!("production"));
                fields
            },
            env_filter: Some("tower_http=warn".to_string()),
            service_name: None,
            service_version: None,
        }
    }

    /// Create development logging configuration
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            global_fields: {
                let mut fields = serde_json::Map::new();
                fields.insert("env".to_string(), json!("development"));
                fields
            },
            env_filter: Some("tower_http=debug,hyper=info".to_string()),
            service_name: None,
            service_version: None,
        }
    }

    /// Create test logging configuration (minimal output)
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Plain,
            include_location: false,
            global_fields: {
                let mut fields = serde_json::Map::new();
                fields.insert("env".to_string(), json!("test"));
                fields
            },
            env_filter: Some("tower_http=error".to_string()),
            service_name: None,
            service_version: None,
        }
    }

    /// Preset for an environment
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Testing => Self::test(),
            Environment::Development => Self::development(),
        }
    }

    /// Add a global field to the initialization record
    pub fn with_global_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.global_fields.insert(key.into(), value.into());
        self
    }

    /// Set service name and version
    pub fn with_service(mut self, name: &str, version: &str) -> Self {
        self.service_name = Some(name.to_string());
        self.service_version = Some(version.to_string());
        self
    }

    /// Set environment filter
    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// `EnvFilter` directives: the level as default, then the per-target overrides
    pub fn filter_directives(&self) -> String {
        match &self.env_filter {
            Some(directives) => format!("{},{}", self.level, directives),
            None => self.level.clone(),
        }
    }
}

impl From<&WebcastorConfig> for LoggingConfig {
    /// Environment preset, with `LOG_LEVEL` and `LOG_FORMAT` taking precedence
    fn from(config: &WebcastorConfig) -> Self {
        let mut logging = LoggingConfig::for_environment(config.environment)
            .with_service(webcastor_core::SERVICE_NAME, webcastor_core::VERSION);
        logging.level = config.log_level.clone();
        logging.format = config.log_format;
        logging
    }
}

/// Initialize structured logging for the process
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directives()))?;

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                Layer::new()
                    .with_writer(io::stdout)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .json(),
            )
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                Layer::new()
                    .with_writer(io::stdout)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Plain => tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).with_ansi(false))
            .try_init()?,
    }

    let mut init_msg = json!({
        "message": "Structured logging initialized",
        "config": {
            "level": config.level,
            "format": config.format.to_string(),
            "include_location": config.include_location,
        }
    });

    if let Some(name) = config.service_name {
        init_msg["service_name"] = json!(name);
    }
    if let Some(version) = config.service_version {
        init_msg["service_version"] = json!(version);
    }
    for (key, value) in config.global_fields {
        init_msg[key] = value;
    }

    tracing::info!(target: "webcastor::logging", "{}", init_msg);

    Ok(())
}

/// Log startup information
pub fn log_startup_info(config: &WebcastorConfig) {
    tracing::info!(
        target: "webcastor::startup",
        service = webcastor_core::SERVICE_NAME,
        version = webcastor_core::VERSION,
        environment = %config.environment,
        "Starting {} on {}:{}",
        webcastor_core::SERVICE_NAME,
        config.host,
        config.port
    );

    tracing::info!(
        target: "webcastor::startup",
        "Credential store: {}; message size limit: {} bytes",
        if config.store.is_persistent() { "redis" } else { "memory" },
        config.message_size_limit
    );
}

/// Log shutdown information
pub fn log_shutdown_info() {
    tracing::info!(
        target: "webcastor::shutdown",
        "{} shutting down gracefully",
        webcastor_core::SERVICE_NAME
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Plain);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_environment_presets() {
        let prod = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod.format, LogFormat::Json);
        assert_eq!(prod.global_fields["env"], json!("production"));

        let dev = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.include_location);

        let test = LoggingConfig::for_environment(Environment::Testing);
        assert_eq!(test.level, "error");
    }

    #[test]
    fn test_server_config_overrides_preset() {
        let server = WebcastorConfig {
            environment: Environment::Production,
            log_level: "warn".to_string(),
            log_format: LogFormat::Plain,
            ..Default::default()
        };

        let logging = LoggingConfig::from(&server);
        assert_eq!(logging.level, "warn");
        assert_eq!(logging.format, LogFormat::Plain);
        assert_eq!(logging.filter_directives(), "warn,tower_http=warn");
        assert_eq!(logging.service_name.as_deref(), Some("webcastor"));
    }

    #[test]
    fn test_builder_helpers() {
        let config = LoggingConfig::default()
            .with_global_field("region", "eu")
            .with_env_filter("webcastor_http=trace");

        assert_eq!(config.global_fields["region"], json!("eu"));
        assert_eq!(config.filter_directives(), "info,webcastor_http=trace");
        assert_eq!(LoggingConfig::default().filter_directives(), "info");
    }
}
