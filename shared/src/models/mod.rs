//! Domain models for the AgriWeather platform

mod advisory;
mod alert;
mod bundle;
mod forecast;
mod weather;

pub use advisory::*;
pub use alert::*;
pub use bundle::*;
pub use forecast::*;
pub use weather::*;
