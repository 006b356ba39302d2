//! HTTP surface of the restock notifier.
//!
//! Endpoints:
//! - `POST /subscribe` — create or replace a subscription
//! - `POST /inventory/restock` — notify pending subscribers of an item
//! - `GET  /subscriptions/{user_id}/{item_id}` — fulfillment state
//! - `GET  /health`

pub mod routes;
pub mod state;
