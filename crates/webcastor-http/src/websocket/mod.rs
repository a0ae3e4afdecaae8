//! WebSocket side of the relay: handshake, group membership, message
//! fan-out and the per-connection task

pub mod connection;
pub mod gateway;
pub mod groups;
pub mod guard;
pub mod types;

pub use connection::run_connection;
pub use gateway::ConnectionGateway;
pub use groups::{BroadcastGroups, BroadcastResult, GroupStats};
pub use guard::{encoded_size, MessageGuard};
pub use types::*;
