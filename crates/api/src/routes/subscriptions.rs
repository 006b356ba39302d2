//! Subscription routes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use restock_common::error::AppError;
use restock_common::types::Subscription;
use restock_engine::SubscriptionService;
use restock_engine::subscription::SubscribeParams;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/subscriptions/{user_id}/{item_id}", get(get_subscription))
}

/// POST /subscribe — Create a subscription, or replace the channels of an
/// existing one and reset it to PENDING.
async fn subscribe(
    State(state): State<AppState>,
    body: Result<Json<SubscribeParams>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(params) =
        body.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    let sub = SubscriptionService::create_or_replace(state.store.as_ref(), &params).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "subscribed",
            "subscription_id": sub.id,
        })),
    ))
}

/// GET /subscriptions/:user_id/:item_id — Current channels and fulfillment state.
async fn get_subscription(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<Subscription>, AppError> {
    let Path((user_id, item_id)) =
        path.map_err(|e| AppError::Validation(format!("Invalid path: {}", e)))?;
    let sub = SubscriptionService::get(state.store.as_ref(), user_id, item_id).await?;
    Ok(Json(sub))
}
