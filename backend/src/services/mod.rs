//! Business logic services for the AgriWeather server

pub mod dashboard;
pub mod location;
pub mod weather;

pub use dashboard::{Dashboard, DashboardState, DashboardStatus, DashboardView};
pub use location::{
    DevicePosition, GeolocationOptions, Geolocator, LocationIntent, LocationResolver,
    NoGeolocation, ReportedPosition,
};
pub use weather::{WeatherService, WeatherSnapshot};
