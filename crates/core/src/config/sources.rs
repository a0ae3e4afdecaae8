use crate::config::ConfigError;
use std::env;
use std::str::FromStr;

/// Where a configuration value came from, for debugging
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Value loaded from environment variable
    EnvVar(String),
    /// Default value used
    Default(String),
    /// Value provided programmatically
    Programmatic,
}

impl ConfigSource {
    /// Record the env var when it is set, the default otherwise
    pub fn env_or_default(var: &str, default: impl Into<String>) -> Self {
        if env::var(var).is_ok() {
            ConfigSource::EnvVar(var.to_string())
        } else {
            ConfigSource::Default(default.into())
        }
    }

    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar(_))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }

    /// Get source description
    pub fn description(&self) -> String {
        match self {
            ConfigSource::EnvVar(var) => format!("Environment variable: {}", var),
            ConfigSource::Default(value) => format!("Default value: {}", value),
            ConfigSource::Programmatic => "Programmatically set".to_string(),
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Read an environment variable, treating empty values as unset
pub fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Read an environment variable or fall back to a default
pub fn env_or_default(key: &str, default: &str) -> String {
    read_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset
pub fn parse_env<T: FromStr>(key: &str, default: T, expected: &str) -> Result<T, ConfigError> {
    match read_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::invalid_value(key, raw, expected)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_parse_env_uses_default_when_unset() {
        env::remove_var("WEBCASTOR_TEST_NUMBER");
        let value: u64 = parse_env("WEBCASTOR_TEST_NUMBER", 42, "a number").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    #[serial]
    fn test_parse_env_rejects_garbage() {
        env::set_var("WEBCASTOR_TEST_NUMBER", "forty-two");
        let result: Result<u64, _> = parse_env("WEBCASTOR_TEST_NUMBER", 42, "a number");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        env::remove_var("WEBCASTOR_TEST_NUMBER");
    }

    #[test]
    #[serial]
    fn test_empty_env_is_unset() {
        env::set_var("WEBCASTOR_TEST_EMPTY", "   ");
        assert_eq!(read_env("WEBCASTOR_TEST_EMPTY"), None);
        assert_eq!(env_or_default("WEBCASTOR_TEST_EMPTY", "fallback"), "fallback");
        env::remove_var("WEBCASTOR_TEST_EMPTY");
    }

    #[test]
    #[serial]
    fn test_source_tracking() {
        env::set_var("WEBCASTOR_TEST_SOURCE", "1");
        assert!(ConfigSource::env_or_default("WEBCASTOR_TEST_SOURCE", "0").is_env_var());
        env::remove_var("WEBCASTOR_TEST_SOURCE");
        assert!(ConfigSource::env_or_default("WEBCASTOR_TEST_SOURCE", "0").is_default());
    }
}
