//! Wire events and per-connection session state

use crate::channel::ChannelId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier for WebSocket connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Events sent from the server to a client.
///
/// Encoded as `{"event": "<name>", "data": <payload>}` text frames; variants
/// without a payload omit `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    UnknownChannel,
    Authenticated,
    AuthenticationError,
    Message(Value),
}

/// Events sent from a client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Message(Value),
}

/// Query parameters of the WebSocket upgrade request.
///
/// An absent `password` requests listener mode. A present but empty one
/// requests broadcaster mode with an empty password.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandshakeParams {
    pub channel: Option<String>,
    pub password: Option<String>,
}

impl HandshakeParams {
    pub fn listener<S: Into<String>>(channel: S) -> Self {
        Self {
            channel: Some(channel.into()),
            password: None,
        }
    }

    pub fn broadcaster<S: Into<String>, P: Into<String>>(channel: S, password: P) -> Self {
        Self {
            channel: Some(channel.into()),
            password: Some(password.into()),
        }
    }
}

/// Lifecycle state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake in progress
    Joining,
    /// Requested channel does not exist; connection stays open but inert
    Unknown,
    /// Receives broadcasts only
    Listener,
    /// Authenticated; its messages are relayed to the group
    Broadcaster,
    /// Wrong password; receives broadcasts but cannot send
    AuthFailed,
}

/// A connection's view of its channel membership
#[derive(Debug, Clone)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub channel_id: Option<ChannelId>,
    pub state: SessionState,
}

impl Session {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            channel_id: None,
            state: SessionState::Joining,
        }
    }

    /// Whether the connection belongs to a broadcast group
    pub fn is_member(&self) -> bool {
        matches!(
            self.state,
            SessionState::Listener | SessionState::Broadcaster | SessionState::AuthFailed
        )
    }

    pub fn can_broadcast(&self) -> bool {
        self.state == SessionState::Broadcaster
    }
}

/// Sending half of a connection's outbound queue
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    /// Create a handle and the receiver its connection task drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                id: ConnectionId::new(),
                sender,
            },
            receiver,
        )
    }

    /// Queue an event for this connection; false once the connection is gone
    pub fn emit(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_event_wire_format() {
        assert_eq!(
            serde_json::to_value(ServerEvent::UnknownChannel).unwrap(),
            json!({"event": "unknown_channel"})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::Authenticated).unwrap(),
            json!({"event": "authenticated"})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::AuthenticationError).unwrap(),
            json!({"event": "authentication_error"})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::Message(json!({"slide": 3}))).unwrap(),
            json!({"event": "message", "data": {"slide": 3}})
        );
    }

    #[test]
    fn test_client_event_parsing() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"message","data":"hello"}"#).unwrap();
        assert_eq!(event, ClientEvent::Message(json!("hello")));

        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"authenticate"}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>("not json").is_err());
    }

    #[test]
    fn test_session_capabilities() {
        let mut session = Session::new(ConnectionId::new());
        assert!(!session.is_member());

        session.state = SessionState::AuthFailed;
        assert!(session.is_member());
        assert!(!session.can_broadcast());

        session.state = SessionState::Broadcaster;
        assert!(session.can_broadcast());

        session.state = SessionState::Unknown;
        assert!(!session.is_member());
    }

    #[test]
    fn test_handle_emit_after_receiver_dropped() {
        let (handle, receiver) = ConnectionHandle::new();
        assert!(handle.emit(ServerEvent::Authenticated));

        drop(receiver);
        assert!(!handle.emit(ServerEvent::Authenticated));
    }
}
