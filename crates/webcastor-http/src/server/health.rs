//! Health check endpoint implementation

use super::context::AppContext;
use crate::websocket::GroupStats;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use webcastor_core::Environment;

/// Health check response structure
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: Environment,
    pub timestamp: u64,
    pub uptime_secs: u64,
    pub store: String,
    pub groups: GroupStats,
}

/// Report liveness along with store backend and group occupancy
pub async fn health_check_handler(State(context): State<AppContext>) -> Json<HealthStatus> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    Json(HealthStatus {
        status: "healthy".to_string(),
        service: webcastor_core::SERVICE_NAME.to_string(),
        version: webcastor_core::VERSION.to_string(),
        environment: context.config().environment,
        timestamp,
        uptime_secs: context.uptime_secs(),
        store: context.registry().backend_name().to_string(),
        groups: context.groups().stats().await,
    })
}
