//! # webcastor-core
//!
//! Configuration primitives shared by the webcastor crates: the
//! [`AppConfigTrait`] contract, source tracking for debugging, the
//! [`ConfigError`] type and a handful of reusable validators.

pub mod config;

pub use config::{
    env_or_default, parse_env, read_env, AppConfigTrait, ConfigError, ConfigSource,
    ConfigValidator, Environment, PortValidator, UrlValidator,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs and health responses
pub const SERVICE_NAME: &str = "webcastor";
