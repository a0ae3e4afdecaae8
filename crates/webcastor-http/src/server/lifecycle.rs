//! Server lifecycle management - startup, shutdown, and signal handling

use crate::errors::{HttpError, HttpResult};
use crate::logging::log_shutdown_info;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// Bind `addr` and serve until a shutdown signal arrives
pub async fn start_server(
    addr: SocketAddr,
    router: axum::Router,
    shutdown_timeout: Duration,
) -> HttpResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| HttpError::startup(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);

    serve(listener, router, shutdown_signal(), shutdown_timeout).await
}

/// Serve on an already-bound listener.
///
/// Once `shutdown` resolves, open connections get `shutdown_timeout` to
/// finish before the server returns anyway.
pub async fn serve<F>(
    listener: TcpListener,
    router: axum::Router,
    shutdown: F,
    shutdown_timeout: Duration,
) -> HttpResult<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let trigger = draining.clone();

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            log_shutdown_info();
            trigger.notify_one();
        })
        .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| HttpError::internal(format!("Server error: {}", e)))?;
        }
        _ = async {
            draining.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!("Shutdown timeout of {:?} elapsed, dropping open connections", shutdown_timeout);
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down gracefully...");
        },
    }
}
