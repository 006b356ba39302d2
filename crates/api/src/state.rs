//! Shared application state for the Axum API server.

use std::sync::Arc;

use restock_common::config::AppConfig;
use restock_engine::{DispatchStore, MirrorDocument, NotificationDispatcher};
use restock_notifier::ChannelRegistry;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DispatchStore>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    /// Wire the dispatcher over `store` with the given channel table and the
    /// mirror document named in `config`.
    pub fn new(store: Arc<dyn DispatchStore>, channels: ChannelRegistry, config: &AppConfig) -> Self {
        let mirror = Arc::new(MirrorDocument::new(config.notifications_json_path.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&store),
            Arc::new(channels),
            mirror,
        ));

        Self { store, dispatcher }
    }
}
