//! Atrium Auth API
//!
//! Authentication service: session token issuance/refresh, request
//! authentication, and Pub/Sub push webhook verification.

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Atrium Auth API");

    let config = Config::from_env()?;
    let http_port = config.http_port;

    let pool = atrium_db::create_pool(&config.database_url).await?;
    let state = AppState::new(config, pool)?;

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the service router
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/webhooks/pubsub", post(handlers::webhook::pubsub_push))
        .with_state(state)
}
