//! Channel creation and health endpoints, driven through the router

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use webcastor_http::server::CreatedChannel;
use webcastor_http::{build_router, AppContext, ChannelId, WebcastorConfig};
use webcastor_store::{CredentialStore, MemoryStore, StoreError, StoreResult};

struct UnreachableStore;

#[async_trait]
impl CredentialStore for UnreachableStore {
    async fn set(&self, _key: &str, _value: String) -> StoreResult<()> {
        Err(StoreError::Unavailable("Redis is not connected".to_string()))
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("Redis is not connected".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

fn context() -> AppContext {
    AppContext::with_store(WebcastorConfig::default(), Arc::new(MemoryStore::new()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_protected_channel_with_json() {
    let context = context();
    let app = build_router(context.clone());

    let response = app
        .oneshot(
            Request::post("/channels")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::HOST, "cast.example.com")
                .body(Body::from(r#"{"password":"hunter2"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: CreatedChannel = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(
        created.shareable_url,
        format!("https://cast.example.com/?channel={}", created.channel_id)
    );

    let credential = context
        .registry()
        .credential(&ChannelId::from(created.channel_id))
        .await
        .unwrap();
    assert!(!credential.is_open());
    assert!(credential.verify("hunter2"));
}

#[tokio::test]
async fn test_create_open_channel_with_form() {
    let context = context();
    let app = build_router(context.clone());

    let response = app
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("password="))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = body["channelId"].as_str().unwrap().to_string();

    let credential = context
        .registry()
        .credential(&ChannelId::from(id))
        .await
        .unwrap();
    assert!(credential.is_open());
}

#[tokio::test]
async fn test_missing_password_creates_open_channel() {
    let context = context();
    let app = build_router(context.clone());

    let response = app
        .oneshot(
            Request::post("/channels")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = ChannelId::from(body["channelId"].as_str().unwrap());
    assert!(context.registry().credential(&id).await.unwrap().is_open());
}

#[tokio::test]
async fn test_create_fails_with_503_when_store_down() {
    let context = AppContext::with_store(WebcastorConfig::default(), Arc::new(UnreachableStore));
    let app = build_router(context);

    let response = app
        .oneshot(
            Request::post("/channels")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"password":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(context());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "webcastor");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["groups"]["total_groups"], 0);
}
