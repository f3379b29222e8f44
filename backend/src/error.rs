//! Error handling for the AgriWeather server
//!
//! Provides consistent JSON error responses and the user-facing messages shown
//! when a weather refresh fails

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Location errors
    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Geolocation unavailable: {0}")]
    Capability(String),

    // External service errors
    #[error("{context}: {message}")]
    Upstream {
        context: &'static str,
        message: String,
    },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Refresh lifecycle errors
    #[error("A weather refresh is already in progress")]
    Busy,

    #[error("Weather refresh was cancelled")]
    Cancelled,

    // Authentication errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(context: &'static str, message: impl Into<String>) -> Self {
        AppError::Upstream {
            context,
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Message shown on the dashboard when a refresh ends in this error
    pub fn user_message(&self) -> String {
        match self {
            AppError::Configuration(msg) => msg.clone(),
            AppError::Upstream { context, .. } => (*context).to_string(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether retrying the same request could succeed.
    ///
    /// A missing API key will not fix itself between attempts.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            AppError::Configuration(_) | AppError::Validation { .. } | AppError::Unauthorized(_)
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let first = errors
            .field_errors()
            .into_iter()
            .next()
            .and_then(|(field, errs)| errs.first().map(|e| (field, e.clone())));

        match first {
            Some((field, error)) => {
                let message = error
                    .message
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                AppError::validation(field, message)
            }
            None => AppError::validation("body", errors.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Configuration(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new("CONFIGURATION_ERROR", msg.clone()),
            ),
            AppError::NotFound(name) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("Location not found: {}", name)),
            ),
            AppError::Capability(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new("GEOLOCATION_UNAVAILABLE", msg.clone()),
            ),
            AppError::Upstream { context, .. } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new("UPSTREAM_ERROR", *context),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::Busy => (
                StatusCode::CONFLICT,
                ErrorDetail::new("REFRESH_IN_PROGRESS", self.to_string()),
            ),
            AppError::Cancelled => (
                StatusCode::CONFLICT,
                ErrorDetail::new("REFRESH_CANCELLED", self.to_string()),
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", msg.clone()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
