//! External API integrations

pub mod weather;

pub use weather::{GeocodedPlace, WeatherClient};
