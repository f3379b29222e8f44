//! Domain models for the AgriWeather server
//!
//! Re-exports the weather models, unit conversions and validators from the
//! shared crate

pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;
