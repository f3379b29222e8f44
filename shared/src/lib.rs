//! Shared types and models for the AgriWeather platform
//!
//! This crate contains the weather domain types and the pure derivations
//! (daily forecast reduction, theme and alert classification, agricultural
//! advisories) shared between the backend and the browser (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
