//! Restock notifier API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use restock_common::config::{AppConfig, LogFormat};
use restock_common::db::{create_pool, run_migrations};
use restock_engine::PgDispatchStore;
use restock_notifier::ChannelRegistry;

use restock_api::routes::create_router;
use restock_api::state::AppState;

const DEFAULT_LOG_FILTER: &str =
    "restock_api=debug,restock_engine=debug,restock_notifier=info,tower_http=debug";

/// Request bodies are tiny JSON objects.
const MAX_BODY_BYTES: usize = 64 * 1024;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let log_format = LogFormat::from_env()?;
    init_tracing(log_format);

    tracing::info!("Starting restock notifier API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Create database connection pool and bring the schema up to date
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;

    let channels = ChannelRegistry::with_defaults(config.channel_send_timeout());
    tracing::info!(
        channels = ?channels.channels(),
        send_timeout = ?channels.send_timeout(),
        mirror = %config.notifications_json_path.display(),
        "Notification channels configured"
    );

    // Build application state
    let port = config.port;
    let state = AppState::new(Arc::new(PgDispatchStore::new(pool)), channels, &config);

    // Build router
    let app = create_router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!("Subscribe: POST http://localhost:{}/subscribe", port);
    tracing::info!("Restock:   POST http://localhost:{}/inventory/restock", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    tracing::info!("Restock notifier API server stopped.");
    Ok(())
}
