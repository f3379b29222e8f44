//! HTTP handlers

pub mod health;
pub mod weather;

pub use health::health_check;
pub use weather::{cancel_weather, get_dashboard, locate_weather, retry_weather, search_weather};
