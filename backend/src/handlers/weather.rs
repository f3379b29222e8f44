//! HTTP handlers for the weather dashboard endpoints

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentViewer;
use crate::models::Coordinates;
use crate::services::{DashboardView, DevicePosition, Geolocator, ReportedPosition};
use crate::AppState;

/// Search request body
#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Place name must be between 1 and 100 characters"
    ))]
    pub city: String,
}

/// Device position as reported by the client
#[derive(Debug, Deserialize, Validate)]
pub struct PositionReport {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    /// When the fix was taken; defaults to now
    pub captured_at: Option<DateTime<Utc>>,
}

/// "Use current location" request body
#[derive(Debug, Deserialize)]
pub struct LocateRequest {
    /// `null` when the client could not get a position
    pub position: Option<PositionReport>,
    /// Why the client could not get a position
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// Get the current dashboard view
pub async fn get_dashboard(
    State(state): State<AppState>,
    _viewer: CurrentViewer,
) -> Json<DashboardView> {
    Json(state.dashboard.view())
}

/// Refresh the dashboard for a place name
pub async fn search_weather(
    State(state): State<AppState>,
    viewer: CurrentViewer,
    Json(input): Json<SearchRequest>,
) -> AppResult<Json<DashboardView>> {
    input.validate()?;
    tracing::info!(viewer = %viewer.0.subject, city = %input.city, "Weather search requested");

    let committed = state.dashboard.search(&input.city).await?;
    Ok(Json(DashboardView::from(committed.as_ref())))
}

/// Refresh the dashboard for the device position
pub async fn locate_weather(
    State(state): State<AppState>,
    viewer: CurrentViewer,
    Json(input): Json<LocateRequest>,
) -> AppResult<Json<DashboardView>> {
    let geolocator: Arc<dyn Geolocator> = match input.position {
        Some(report) => {
            report.validate()?;
            Arc::new(ReportedPosition::fix(DevicePosition {
                coordinates: Coordinates::new(report.latitude, report.longitude),
                captured_at: report.captured_at.unwrap_or_else(Utc::now),
            }))
        }
        None => Arc::new(ReportedPosition::failed(
            input
                .error
                .unwrap_or_else(|| "Device position unavailable".to_string()),
        )),
    };
    tracing::info!(viewer = %viewer.0.subject, "Current location requested");

    let committed = state.dashboard.locate(geolocator).await?;
    Ok(Json(DashboardView::from(committed.as_ref())))
}

/// Replay the last request
pub async fn retry_weather(
    State(state): State<AppState>,
    viewer: CurrentViewer,
) -> AppResult<Json<DashboardView>> {
    tracing::info!(viewer = %viewer.0.subject, "Weather retry requested");

    let committed = state.dashboard.retry().await?;
    Ok(Json(DashboardView::from(committed.as_ref())))
}

/// Cancel the in-flight refresh
pub async fn cancel_weather(
    State(state): State<AppState>,
    _viewer: CurrentViewer,
) -> Json<CancelResponse> {
    Json(CancelResponse {
        cancelled: state.dashboard.cancel(),
    })
}
