//! # webcastor-http
//!
//! WebSocket broadcast relay. A client creates a channel, optionally
//! protected by a password; one authenticated broadcaster then relays JSON
//! messages to every listener joined to that channel.
//!
//! ## Layout
//!
//! - [`channel`]: channel identifiers, hashed credentials and the registry
//! - [`websocket`]: handshake, broadcast groups, size gate, connection task
//! - [`server`]: axum routes, shared context and lifecycle
//! - [`config`], [`logging`], [`errors`]: ambient concerns

pub mod channel;
pub mod config;
pub mod errors;
pub mod logging;
pub mod server;
pub mod websocket;

pub use channel::{ChannelId, ChannelRegistry, Credential};
pub use config::WebcastorConfig;
pub use errors::{ChannelError, ChannelResult, HttpError, HttpResult};
pub use logging::{init_logging, LoggingConfig};
pub use server::{build_router, AppContext};
pub use websocket::{ClientEvent, ServerEvent};

/// Load, validate and run the relay until shutdown
pub async fn run(config: WebcastorConfig) -> HttpResult<()> {
    let addr = config.socket_addr()?;
    let shutdown_timeout = config.shutdown_timeout;

    let context = AppContext::from_config(config).await?;
    let router = build_router(context);

    server::start_server(addr, router, shutdown_timeout).await
}
