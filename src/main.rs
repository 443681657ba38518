// SPDX-License-Identifier: MIT

//! Accounts API server.
//!
//! User CRUD endpoints plus OAuth2 authorization-code login with signed
//! cookie sessions, backed by SQLite.

use accounts_api::{
    config::Config, db::Database, services::OAuthClient, session::SessionCodec, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = %config.environment,
        port = config.port,
        "Starting accounts API"
    );

    // Connect SQLite and apply the schema
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(url = %config.database_url, "Database ready");

    let sessions = SessionCodec::new(&config.session_secret, config.production);
    let oauth = OAuthClient::new();

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        sessions,
        oauth,
    });

    // Build router
    let app = accounts_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("accounts_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
