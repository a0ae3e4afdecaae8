//! HTTP routes: channel creation, the WebSocket upgrade and health

use super::context::AppContext;
use super::health::health_check_handler;
use crate::channel::ChannelId;
use crate::config::WebcastorConfig;
use crate::errors::HttpResult;
use crate::websocket::{run_connection, HandshakeParams};
use axum::extract::{Query, Request, State, WebSocketUpgrade};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Span};

/// Body of a channel-creation request, as JSON or a URL-encoded form
#[derive(Debug, Default, Deserialize)]
pub struct CreateChannelRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedChannel {
    pub channel_id: String,
    pub shareable_url: String,
}

/// Build the relay's router over a shared [`AppContext`]
pub fn build_router(context: AppContext) -> Router {
    let health_path = context.config().health_check_path.clone();

    Router::new()
        .route("/", post(create_channel_form))
        .route("/channels", post(create_channel_json))
        .route("/ws", get(websocket_upgrade))
        .route(&health_path, get(health_check_handler))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(context)
}

/// Request span carrying the method and path only; query strings hold passwords
fn request_span(request: &Request) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path()
    )
}

async fn create_channel_json(
    State(context): State<AppContext>,
    headers: HeaderMap,
    Json(request): Json<CreateChannelRequest>,
) -> HttpResult<(StatusCode, Json<CreatedChannel>)> {
    create_channel(&context, &headers, request).await
}

async fn create_channel_form(
    State(context): State<AppContext>,
    headers: HeaderMap,
    Form(request): Form<CreateChannelRequest>,
) -> HttpResult<(StatusCode, Json<CreatedChannel>)> {
    create_channel(&context, &headers, request).await
}

async fn create_channel(
    context: &AppContext,
    headers: &HeaderMap,
    request: CreateChannelRequest,
) -> HttpResult<(StatusCode, Json<CreatedChannel>)> {
    let password = request.password.unwrap_or_default();
    let channel_id = context.registry().create(&password).await?;

    let shareable_url = shareable_url(context.config(), headers, &channel_id);
    info!("Channel {} shareable at {}", channel_id, shareable_url);

    Ok((
        StatusCode::CREATED,
        Json(CreatedChannel {
            channel_id: channel_id.to_string(),
            shareable_url,
        }),
    ))
}

/// URL listeners open to join a channel
pub fn shareable_url(config: &WebcastorConfig, headers: &HeaderMap, channel_id: &ChannelId) -> String {
    let base = match &config.public_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("localhost");
            format!("https://{}", host)
        }
    };

    format!("{}/?channel={}", base, channel_id)
}

async fn websocket_upgrade(
    State(context): State<AppContext>,
    Query(params): Query<HandshakeParams>,
    ws: WebSocketUpgrade,
) -> Response {
    info!("Incoming connection for channel {:?}", params.channel);
    ws.on_upgrade(move |socket| run_connection(socket, params, context))
}
