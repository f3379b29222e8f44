//! AgriWeather - Backend Server
//!
//! Aggregates current conditions and forecasts for a location and derives
//! presentation themes, weather alerts and agricultural advisories.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

pub use crate::config::Config;

use services::{Dashboard, NoGeolocation};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dashboard: Dashboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    init_tracing(&config.log_format);

    tracing::info!("Starting AgriWeather Server");
    tracing::info!("Environment: {}", config.environment);

    let dashboard = Dashboard::new(&config.weather, &config.geolocation)?;

    // Initial load: no device on the server, so this resolves the default place
    tokio::spawn({
        let dashboard = dashboard.clone();
        async move {
            if let Err(err) = dashboard.locate(Arc::new(NoGeolocation)).await {
                tracing::warn!(error = %err, "Initial weather load did not start");
            }
        }
    });

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        dashboard: dashboard.clone(),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((ip, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(dashboard))
        .await?;

    Ok(())
}

fn init_tracing(log_format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "agri_weather_server=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on Ctrl+C, cancelling any in-flight refresh
async fn shutdown_signal(dashboard: Dashboard) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
    dashboard.cancel();
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AgriWeather API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
