//! Integration tests for API routes.
//!
//! Uses `tower::ServiceExt` to test Axum routes without a real HTTP server,
//! backed by the in-memory store so no database is needed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use restock_api::routes::create_router;
use restock_api::state::AppState;
use restock_common::config::AppConfig;
use restock_engine::{DispatchStore, MemoryDispatchStore};
use restock_notifier::{ChannelRegistry, ChannelSender, DeliveryError};

// ============================================================
// Helpers
// ============================================================

struct DownSender;

#[async_trait]
impl ChannelSender for DownSender {
    async fn send(&self, _user_id: i64, _item_id: i64) -> Result<(), DeliveryError> {
        Err(DeliveryError::Unavailable("provider offline".to_string()))
    }
}

/// Create a test AppConfig writing its mirror into `dir`.
fn test_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        notifications_json_path: dir.path().join("notifications.json"),
        channel_send_timeout_ms: 500,
        ..AppConfig::default()
    }
}

fn build_test_state(store: &MemoryDispatchStore, channels: ChannelRegistry, dir: &TempDir) -> AppState {
    AppState::new(Arc::new(store.clone()), channels, &test_config(dir))
}

fn default_channels() -> ChannelRegistry {
    ChannelRegistry::with_defaults(Duration::from_millis(500))
}

async fn send_json(
    state: &AppState,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = create_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_json(state: &AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = create_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================
// Routes
// ============================================================

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryDispatchStore::new();
    let state = build_test_state(&store, default_channels(), &dir);

    let (status, json) = get_json(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "restock-api");
}

#[tokio::test]
async fn test_subscribe_then_restock() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryDispatchStore::new();
    let state = build_test_state(&store, default_channels(), &dir);

    let (status, json) = send_json(
        &state,
        "/subscribe",
        serde_json::json!({"user_id": 1, "item_id": 42, "channels": ["email", "sms"]}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "subscribed");

    let (status, json) = get_json(&state, "/subscriptions/1/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "PENDING");
    assert_eq!(json["channels"], serde_json::json!(["email", "sms"]));

    let (status, json) = send_json(
        &state,
        "/inventory/restock",
        serde_json::json!({"item_id": 42, "new_stock": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "restocked");
    assert_eq!(json["item_id"], 42);
    assert_eq!(json["attempted"], 1);
    assert_eq!(json["notified"], 1);

    let (_, json) = get_json(&state, "/subscriptions/1/42").await;
    assert_eq!(json["status"], "NOTIFIED");
    assert_eq!(store.notifications_for(1, 42).await.unwrap().len(), 2);

    // Repeat restock touches nothing
    let (status, json) =
        send_json(&state, "/inventory/restock", serde_json::json!({"item_id": 42})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["attempted"], 0);
    assert_eq!(store.notifications_for(1, 42).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_restock_succeeds_when_every_delivery_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryDispatchStore::new();
    let channels = default_channels().register("sms", Arc::new(DownSender));
    let state = build_test_state(&store, channels, &dir);

    send_json(
        &state,
        "/subscribe",
        serde_json::json!({"user_id": 2, "item_id": 42, "channels": ["sms"]}),
    )
    .await;

    let (status, json) =
        send_json(&state, "/inventory/restock", serde_json::json!({"item_id": 42})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pending"], 1);
    assert_eq!(json["notified"], 0);

    let (_, json) = get_json(&state, "/subscriptions/2/42").await;
    assert_eq!(json["status"], "PENDING");
}

#[tokio::test]
async fn test_subscribe_validation() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryDispatchStore::new();
    let state = build_test_state(&store, default_channels(), &dir);

    let (status, json) = send_json(
        &state,
        "/subscribe",
        serde_json::json!({"user_id": 0, "item_id": 42, "channels": ["email"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("positive"));

    let (status, json) = send_json(
        &state,
        "/subscribe",
        serde_json::json!({"user_id": 1, "item_id": 42, "channels": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("channels"));

    let (status, _) = send_json(
        &state,
        "/subscribe",
        serde_json::json!({"user_id": "one", "item_id": 42}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restock_rejects_non_positive_item() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryDispatchStore::new();
    let state = build_test_state(&store, default_channels(), &dir);

    let (status, json) =
        send_json(&state, "/inventory/restock", serde_json::json!({"item_id": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "item_id must be a positive integer");
}

#[tokio::test]
async fn test_missing_subscription_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryDispatchStore::new();
    let state = build_test_state(&store, default_channels(), &dir);

    let (status, _) = get_json(&state, "/subscriptions/9/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_subscription_path_is_json_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryDispatchStore::new();
    let state = build_test_state(&store, default_channels(), &dir);

    let (status, json) = get_json(&state, "/subscriptions/abc/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid path"));
}
