//! Handshake state machine: resolves a connection's role in its channel

use super::groups::BroadcastGroups;
use super::types::{ConnectionHandle, HandshakeParams, ServerEvent, Session, SessionState};
use crate::channel::{ChannelId, ChannelRegistry};
use crate::errors::{ChannelError, ChannelResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Admits connections into broadcast groups and negotiates their role
#[derive(Clone)]
pub struct ConnectionGateway {
    registry: Arc<ChannelRegistry>,
    groups: Arc<BroadcastGroups>,
}

impl ConnectionGateway {
    pub fn new(registry: Arc<ChannelRegistry>, groups: Arc<BroadcastGroups>) -> Self {
        Self { registry, groups }
    }

    /// Run the handshake for a freshly opened connection.
    ///
    /// Emits at most one notification on `handle`: `unknown_channel`,
    /// `authenticated` or `authentication_error`. Listeners get none.
    pub async fn handshake(&self, handle: &ConnectionHandle, params: &HandshakeParams) -> Session {
        let mut session = Session::new(handle.id);

        match self.admit(handle, params, &mut session).await {
            Ok(state) => {
                session.state = state;
                if state == SessionState::Broadcaster {
                    handle.emit(ServerEvent::Authenticated);
                }
            }
            Err(ChannelError::UnknownChannel(channel)) => {
                debug!("Connection {} asked for unknown channel {:?}", handle.id, channel);
                session.state = SessionState::Unknown;
                handle.emit(ServerEvent::UnknownChannel);
            }
            Err(ChannelError::AuthenticationFailure(channel)) => {
                warn!("Authentication failed on channel {} for {}", channel, handle.id);
                session.state = SessionState::AuthFailed;
                handle.emit(ServerEvent::AuthenticationError);
            }
            Err(e) => {
                warn!("Handshake for {} failed: {}", handle.id, e);
                session.state = SessionState::Unknown;
                handle.emit(ServerEvent::UnknownChannel);
            }
        }

        session
    }

    async fn admit(
        &self,
        handle: &ConnectionHandle,
        params: &HandshakeParams,
        session: &mut Session,
    ) -> ChannelResult<SessionState> {
        let requested = params.channel.clone().unwrap_or_default();
        let channel_id = ChannelId::from(requested.as_str());

        let credential = self
            .registry
            .credential(&channel_id)
            .await
            .ok_or_else(|| ChannelError::unknown_channel(requested))?;

        self.groups.join(&channel_id, handle.clone()).await;
        session.channel_id = Some(channel_id.clone());

        let Some(password) = params.password.as_deref() else {
            info!("Connection {} joined channel {} as listener", handle.id, channel_id);
            return Ok(SessionState::Listener);
        };

        if credential.authenticate(password).await {
            info!(
                "Connection {} authenticated as broadcaster on channel {}",
                handle.id, channel_id
            );
            Ok(SessionState::Broadcaster)
        } else {
            Err(ChannelError::AuthenticationFailure(channel_id))
        }
    }

    /// Release a connection's group membership
    pub async fn disconnect(&self, session: &Session) {
        if let Some(channel_id) = &session.channel_id {
            self.groups.leave(channel_id, session.connection_id).await;
        }
        debug!(
            "Connection {} disconnected in state {:?}",
            session.connection_id, session.state
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelRegistry;
    use webcastor_store::MemoryStore;

    async fn setup() -> (ConnectionGateway, Arc<ChannelRegistry>, Arc<BroadcastGroups>) {
        let registry = Arc::new(ChannelRegistry::new(Arc::new(MemoryStore::new())));
        let groups = Arc::new(BroadcastGroups::new());
        let gateway = ConnectionGateway::new(registry.clone(), groups.clone());
        (gateway, registry, groups)
    }

    #[tokio::test]
    async fn test_unknown_channel() {
        let (gateway, _, groups) = setup().await;
        let (handle, mut rx) = ConnectionHandle::new();

        let session = gateway
            .handshake(&handle, &HandshakeParams::listener("missing"))
            .await;

        assert_eq!(session.state, SessionState::Unknown);
        assert!(session.channel_id.is_none());
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::UnknownChannel);
        assert!(rx.try_recv().is_err());
        assert_eq!(groups.stats().await.total_members, 0);
    }

    #[tokio::test]
    async fn test_missing_channel_parameter_is_unknown() {
        let (gateway, _, _) = setup().await;
        let (handle, mut rx) = ConnectionHandle::new();

        let session = gateway.handshake(&handle, &HandshakeParams::default()).await;

        assert_eq!(session.state, SessionState::Unknown);
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::UnknownChannel);
    }

    #[tokio::test]
    async fn test_listener_gets_no_notification() {
        let (gateway, registry, groups) = setup().await;
        let channel = registry.create("secret").await.unwrap();
        let (handle, mut rx) = ConnectionHandle::new();

        let session = gateway
            .handshake(&handle, &HandshakeParams::listener(channel.as_str()))
            .await;

        assert_eq!(session.state, SessionState::Listener);
        assert!(!session.can_broadcast());
        assert!(rx.try_recv().is_err());
        assert!(groups.is_member(&channel, handle.id).await);
    }

    #[tokio::test]
    async fn test_empty_password_authenticates_on_open_channel() {
        let (gateway, registry, _) = setup().await;
        let channel = registry.create("").await.unwrap();
        let (handle, mut rx) = ConnectionHandle::new();

        let session = gateway
            .handshake(&handle, &HandshakeParams::broadcaster(channel.as_str(), ""))
            .await;

        assert_eq!(session.state, SessionState::Broadcaster);
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::Authenticated);
    }

    #[tokio::test]
    async fn test_correct_password_authenticates() {
        let (gateway, registry, _) = setup().await;
        let channel = registry.create("secret").await.unwrap();
        let (handle, mut rx) = ConnectionHandle::new();

        let session = gateway
            .handshake(&handle, &HandshakeParams::broadcaster(channel.as_str(), "secret"))
            .await;

        assert!(session.can_broadcast());
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::Authenticated);
    }

    #[tokio::test]
    async fn test_wrong_password_stays_in_group() {
        let (gateway, registry, groups) = setup().await;
        let channel = registry.create("secret").await.unwrap();
        let (handle, mut rx) = ConnectionHandle::new();

        let session = gateway
            .handshake(&handle, &HandshakeParams::broadcaster(channel.as_str(), "wrong"))
            .await;

        assert_eq!(session.state, SessionState::AuthFailed);
        assert!(!session.can_broadcast());
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::AuthenticationError);
        assert!(rx.try_recv().is_err());
        assert!(groups.is_member(&channel, handle.id).await);
    }

    #[tokio::test]
    async fn test_disconnect_leaves_group() {
        let (gateway, registry, groups) = setup().await;
        let channel = registry.create("").await.unwrap();
        let (handle, _rx) = ConnectionHandle::new();

        let session = gateway
            .handshake(&handle, &HandshakeParams::listener(channel.as_str()))
            .await;
        assert_eq!(groups.member_count(&channel).await, 1);

        gateway.disconnect(&session).await;
        assert_eq!(groups.member_count(&channel).await, 0);
    }
}
