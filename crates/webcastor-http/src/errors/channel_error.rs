//! Channel and connection error taxonomy

use crate::channel::{ChannelId, PasswordError};
use thiserror::Error;
use webcastor_store::StoreError;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Failures in channel creation, joining and relaying.
///
/// Only [`ChannelError::BackendUnavailable`] and [`ChannelError::Credential`]
/// reach an HTTP client. The rest become socket notifications or are dropped
/// after logging.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Authentication failed for channel {0}")]
    AuthenticationFailure(ChannelId),

    #[error("Message of {size} bytes exceeds limit of {limit} bytes")]
    OversizeMessage { size: usize, limit: usize },

    #[error("Credential store unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Credential error: {0}")]
    Credential(#[from] PasswordError),
}

impl From<StoreError> for ChannelError {
    fn from(err: StoreError) -> Self {
        ChannelError::BackendUnavailable(err.to_string())
    }
}

impl ChannelError {
    pub fn unknown_channel<T: Into<String>>(channel: T) -> Self {
        ChannelError::UnknownChannel(channel.into())
    }
}
