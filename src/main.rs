//! Assistant bot service
//!
//! Hosts the informational chat commands and the interactive calculator
//! behind an HTTP boundary the chat host talks to.

mod api;
mod calculator;
mod commands;
mod config;
mod runtime;
mod state_machine;

use api::{cancel_sessions_on, create_router, AppState};
use config::AppConfig;
use runtime::{SessionManager, WebhookSurface};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistant_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        timeout_secs = config.calculator_timeout.as_secs(),
        retention_secs = config.calculator_retention.as_secs(),
        "Calculator sessions configured"
    );
    if config.safe_browsing_key.is_none() {
        tracing::warn!("GOOGLE_SAFE_BROWSING_KEY not set; url-check will report an error");
    }

    // One HTTP client for the whole process, dropped when main returns
    let http = reqwest::Client::builder()
        .user_agent(concat!("assistant-bot/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let surface = Arc::new(WebhookSurface::new(http.clone()));
    let sessions = Arc::new(SessionManager::new(surface, config.session_config()));
    let state = AppState::new(sessions.clone(), http, config.command_settings());

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Assistant bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(cancel_sessions_on(shutdown_signal(), sessions.clone()))
        .await?;

    tracing::info!(
        remaining = sessions.session_count().await,
        "Server stopped"
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
