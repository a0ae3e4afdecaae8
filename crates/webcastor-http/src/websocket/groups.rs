//! Broadcast groups: the live connections joined to each channel

use super::types::{ConnectionHandle, ConnectionId, ServerEvent};
use crate::channel::ChannelId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

type Members = HashMap<ConnectionId, ConnectionHandle>;

/// Outcome of a fan-out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastResult {
    pub delivered: usize,
    /// Members whose outbound queue was already closed
    pub failed: Vec<ConnectionId>,
}

/// Snapshot of group occupancy
#[derive(Debug, Clone, Serialize)]
pub struct GroupStats {
    pub total_groups: usize,
    pub total_members: usize,
}

/// Per-channel membership of live connections.
///
/// A group exists only while it has members; it is dropped with its last one.
#[derive(Clone, Default)]
pub struct BroadcastGroups {
    groups: Arc<RwLock<HashMap<ChannelId, Members>>>,
}

impl BroadcastGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a channel's group, creating the group if needed
    pub async fn join(&self, channel: &ChannelId, handle: ConnectionHandle) {
        let connection_id = handle.id;
        let mut groups = self.groups.write().await;
        let members = groups.entry(channel.clone()).or_default();
        members.insert(connection_id, handle);

        debug!(
            "Connection {} joined group {} ({} members)",
            connection_id,
            channel,
            members.len()
        );
    }

    /// Remove a connection; returns whether it was a member
    pub async fn leave(&self, channel: &ChannelId, connection_id: ConnectionId) -> bool {
        let mut groups = self.groups.write().await;

        let Some(members) = groups.get_mut(channel) else {
            return false;
        };

        let removed = members.remove(&connection_id).is_some();

        if members.is_empty() {
            groups.remove(channel);
            info!("Group {} is now empty and was removed", channel);
        }

        removed
    }

    /// Deliver an event to every member of a channel except `sender`
    pub async fn broadcast_except(
        &self,
        channel: &ChannelId,
        sender: ConnectionId,
        event: &ServerEvent,
    ) -> BroadcastResult {
        let groups = self.groups.read().await;
        let mut result = BroadcastResult::default();

        let Some(members) = groups.get(channel) else {
            return result;
        };

        for (id, handle) in members {
            if *id == sender {
                continue;
            }

            if handle.emit(event.clone()) {
                result.delivered += 1;
            } else {
                debug!("Connection {} is closing; skipped delivery", id);
                result.failed.push(*id);
            }
        }

        result
    }

    pub async fn member_count(&self, channel: &ChannelId) -> usize {
        let groups = self.groups.read().await;
        groups.get(channel).map_or(0, |members| members.len())
    }

    pub async fn is_member(&self, channel: &ChannelId, connection_id: ConnectionId) -> bool {
        let groups = self.groups.read().await;
        groups
            .get(channel)
            .is_some_and(|members| members.contains_key(&connection_id))
    }

    pub async fn stats(&self) -> GroupStats {
        let groups = self.groups.read().await;
        GroupStats {
            total_groups: groups.len(),
            total_members: groups.values().map(|members| members.len()).sum(),
        }
    }
}
