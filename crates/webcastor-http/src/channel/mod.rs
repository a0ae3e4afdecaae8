//! Broadcast channels: identifiers, credentials and the registry that
//! persists them

pub mod password;
pub mod registry;
pub mod types;


pub use password::{CredentialHash, PasswordError};
pub use registry::ChannelRegistry;
pub use types::{Channel, ChannelId, Credential, OPEN_CREDENTIAL};
