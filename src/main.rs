//! WebUI backend - Main Application Entry Point
//!
//! Brings the database into a ready, migrated state and then serves HTTP.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL from structured parameters, or any sqlx-supported backend from a URL
//! - **Migrations**: sqlx migrator over a migrations directory (URL engine only)
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Rename a legacy Ollama-WebUI database file, if any
//! 3. Connect to the configured engine and run migrations
//! 4. Build HTTP router with the database handle as shared state
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so DB_LOG_LEVEL can shape the filter
    let config = config::Config::from_env()?;

    // Reads RUST_LOG environment variable (defaults to "info" level)
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    if let Some(level) = config.db_log_level.as_deref() {
        filter = filter.add_directive(format!("{}::db={}", env!("CARGO_CRATE_NAME"), level).parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!(engine = config.db_engine.as_str(), "Configuration loaded");

    // Any failure here aborts startup before a request is served
    let db = db::bootstrap(&config, &db::SqlxMigrator).await?;
    tracing::info!(backend = db.backend_name(), "Database ready");

    let app = build_router(AppState::new(db.clone()));

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share the database handle with all handlers via State extraction
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
