//! Per-connection task bridging an axum WebSocket to the relay

use super::types::{ClientEvent, ConnectionHandle, HandshakeParams, ServerEvent, Session};
use crate::server::AppContext;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info};

/// Drive a WebSocket from handshake to disconnect.
///
/// Outbound events are queued on the connection's channel and written here,
/// so a slow client never blocks fan-out to other members.
pub async fn run_connection(socket: WebSocket, params: HandshakeParams, context: AppContext) {
    let (mut sink, mut stream) = socket.split();
    let (handle, mut outbound) = ConnectionHandle::new();

    let session = context.gateway().handshake(&handle, &params).await;
    info!(
        "Connection {} ready in state {:?}",
        session.connection_id, session.state
    );

    loop {
        tokio::select! {
            event = outbound.recv() => {
                let Some(event) = event else { break };
                let text = match encode_event(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to encode event for {}: {}", session.connection_id, e);
                        continue;
                    }
                };
                if sink.send(Message::Text(text)).await.is_err() {
                    debug!("Connection {} went away during send", session.connection_id);
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(&context, &session, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("Connection {} read error: {}", session.connection_id, e);
                        break;
                    }
                }
            }
        }
    }

    context.gateway().disconnect(&session).await;
    let _ = sink.close().await;
}

async fn handle_frame(context: &AppContext, session: &Session, text: &str) {
    let payload = match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Message(payload)) => payload,
        Err(e) => {
            debug!("Ignoring malformed frame from {}: {}", session.connection_id, e);
            return;
        }
    };

    let Some(channel_id) = session.channel_id.as_ref().filter(|_| session.can_broadcast()) else {
        debug!(
            "Ignoring message from {} in state {:?}",
            session.connection_id, session.state
        );
        return;
    };

    if let Err(e) = context
        .guard()
        .relay(channel_id, session.connection_id, payload)
        .await
    {
        debug!("Message from {} not relayed: {}", session.connection_id, e);
    }
}

/// Encode a server event as it appears on the wire
pub fn encode_event(event: &ServerEvent) -> serde_json::Result<String> {
    serde_json::to_string(event)
}
