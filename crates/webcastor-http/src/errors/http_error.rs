//! HTTP server error types
//!
//! Errors surfaced by the channel-creation endpoints and server startup.

use super::ChannelError;
use thiserror::Error;
use webcastor_core::ConfigError;

/// Result type for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

/// HTTP server errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Server startup failed: {message}")]
    StartupFailed { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },
}

impl HttpError {
    /// Create a startup error
    pub fn startup<T: Into<String>>(message: T) -> Self {
        HttpError::StartupFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<T: Into<String>>(message: T) -> Self {
        HttpError::ConfigError {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        HttpError::BadRequest {
            message: message.into(),
        }
    }

    /// Create a service unavailable error
    pub fn unavailable<T: Into<String>>(message: T) -> Self {
        HttpError::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<T: Into<String>>(message: T) -> Self {
        HttpError::InternalError {
            message: message.into(),
        }
    }

    /// Get error code for consistent API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            HttpError::StartupFailed { .. } => "SERVER_STARTUP_FAILED",
            HttpError::ConfigError { .. } => "CONFIGURATION_ERROR",
            HttpError::BadRequest { .. } => "BAD_REQUEST",
            HttpError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            HttpError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<ConfigError> for HttpError {
    fn from(err: ConfigError) -> Self {
        HttpError::config(err.to_string())
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        HttpError::startup(err.to_string())
    }
}

impl From<ChannelError> for HttpError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::BackendUnavailable(message) => HttpError::unavailable(message),
            ChannelError::Credential(e) => HttpError::internal(e.to_string()),
            other => HttpError::bad_request(other.to_string()),
        }
    }
}
