//! Route definitions for the AgriWeather server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - weather dashboard
        .nest("/weather", weather_routes(state))
}

/// Weather dashboard routes (protected)
fn weather_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/search", post(handlers::search_weather))
        .route("/locate", post(handlers::locate_weather))
        .route("/retry", post(handlers::retry_weather))
        .route("/cancel", post(handlers::cancel_weather))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
