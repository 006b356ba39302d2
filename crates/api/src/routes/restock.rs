//! Inventory restock route.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use restock_common::error::AppError;
use restock_engine::RestockSummary;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/inventory/restock", post(restock))
}

/// Request body for a restock event.
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub item_id: i64,
    /// New stock level. Accepted for compatibility; dispatch does not use it.
    #[serde(default)]
    pub new_stock: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RestockResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub summary: RestockSummary,
}

/// POST /inventory/restock — Notify every pending subscriber of the item.
///
/// Individual delivery or storage failures do not fail the request; only a
/// failure to list pending subscriptions does.
async fn restock(
    State(state): State<AppState>,
    body: Result<Json<RestockRequest>, JsonRejection>,
) -> Result<Json<RestockResponse>, AppError> {
    let Json(req) =
        body.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    if req.item_id <= 0 {
        return Err(AppError::Validation(
            "item_id must be a positive integer".to_string(),
        ));
    }

    tracing::info!(item_id = req.item_id, new_stock = ?req.new_stock, "Restock received");

    let summary = state.dispatcher.process_restock(req.item_id).await?;

    Ok(Json(RestockResponse {
        status: "restocked",
        summary,
    }))
}
