//! Size-limited relaying of broadcaster messages

use super::groups::BroadcastGroups;
use super::types::{ConnectionId, ServerEvent};
use crate::channel::ChannelId;
use crate::errors::{ChannelError, ChannelResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Size of a payload in bytes of its compact JSON encoding.
///
/// Key order and number literals are kept as received, so this is the size
/// of what the broadcaster sent minus insignificant whitespace.
pub fn encoded_size(payload: &Value) -> usize {
    payload.to_string().len()
}

/// Enforces the message size limit before fanning out to a group
#[derive(Clone)]
pub struct MessageGuard {
    groups: Arc<BroadcastGroups>,
    size_limit: usize,
}

impl MessageGuard {
    pub fn new(groups: Arc<BroadcastGroups>, size_limit: usize) -> Self {
        Self { groups, size_limit }
    }

    /// Relay `payload` from `sender` to the rest of the channel's group.
    ///
    /// Returns the number of connections it was queued for. Payloads over the
    /// limit are dropped without notifying the sender.
    pub async fn relay(
        &self,
        channel: &ChannelId,
        sender: ConnectionId,
        payload: Value,
    ) -> ChannelResult<usize> {
        let encoded = payload.to_string();
        let size = encoded.len();

        if size > self.size_limit {
            warn!(
                "Not broadcasting message on channel {} ({} bytes, limit {})",
                channel, size, self.size_limit
            );
            debug!("Dropped payload: {}", encoded);
            return Err(ChannelError::OversizeMessage {
                size,
                limit: self.size_limit,
            });
        }

        info!("Broadcasting {} ({} bytes) on channel {}", encoded, size, channel);

        let result = self
            .groups
            .broadcast_except(channel, sender, &ServerEvent::Message(payload))
            .await;

        Ok(result.delivered)
    }
}
