//! CivicPulse
//!
//! A service for citizens to report and follow up on local infrastructure
//! issues.
//!
//! ## Features
//!
//! - **Issue Reporting**: Report issues with a category, location and photos
//! - **Map and List Views**: Filter by category, status, text, time and distance
//! - **Engagement**: Upvote and comment on issues
//! - **Dashboard**: Aggregated statistics and a seven-day trend
//! - **Admin**: Move issues through the status workflow

mod config;
mod db;
mod handlers;
mod models;
mod store;
mod validation;

use axum::{middleware::from_fn_with_state, Router};
use handlers::AppState;
use std::sync::Arc;
use store::{AuthStore, FileSessionStorage, IssueStore, MockIdentityProvider};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civicpulse=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Starting CivicPulse");
    tracing::info!("Environment: {:?}", config.environment);

    // Issue store, loaded from the seed data
    let source = match config.seed {
        Some(seed) => db::SeedIssueSource::with_seed(seed),
        None => db::SeedIssueSource::new(),
    };
    let issues = IssueStore::new(source, config.latency());
    if let Err(e) = issues.fetch_issues().await {
        tracing::error!("Initial issue load failed: {}", e);
    }

    // Auth store, restoring any persisted session
    let sessions = FileSessionStorage::new(&config.data_dir);
    tracing::info!("Session file: {:?}", sessions.path());
    let auth = AuthStore::new(MockIdentityProvider::new(), sessions, config.auth_latency());
    auth.restore().await;

    // Create application state
    let state = AppState {
        issues: Arc::new(issues),
        auth: Arc::new(auth),
        is_production: config.is_production(),
    };

    // Build CORS layer
    let cors = if config.is_production() {
        CorsLayer::new()
            .allow_origin(
                config
                    .cors_origins
                    .iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    // Build main router
    let app = Router::new()
        .nest("/api", handlers::api_routes(state.clone()))
        .fallback_service(ServeDir::new(&config.frontend_dir))
        .layer(from_fn_with_state(
            state.clone(),
            handlers::middleware::security_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(cors)
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Frontend served from: {}", config.frontend_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
