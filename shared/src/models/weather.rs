//! Current weather conditions and presentation theme

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Coordinates;

/// Normalized snapshot of the current conditions at a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub observed_at: DateTime<Utc>,
    pub temperature_celsius: i32,
    pub feels_like_celsius: i32,
    pub humidity_percent: i32,
    pub wind_speed_kmh: i32,
    /// Provider condition group, e.g. "Clear", "Rain", "Clouds"
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub pressure_hpa: i32,
    pub visibility_km: i32,
    pub cloud_cover_percent: i32,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub place_name: String,
    pub country: String,
    pub coordinates: Coordinates,
}

impl CurrentConditions {
    /// "Place, Country", or whichever half is known
    pub fn location_label(&self) -> String {
        match (self.place_name.is_empty(), self.country.is_empty()) {
            (false, false) => format!("{}, {}", self.place_name, self.country),
            (false, true) => self.place_name.clone(),
            (true, false) => self.country.clone(),
            (true, true) => self.coordinates.to_string(),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::from_condition(&self.condition)
    }
}

/// Presentation theme derived from the current condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Sunny,
    Rainy,
    Cloudy,
    #[default]
    Default,
}

impl Theme {
    /// Classify a provider condition label.
    ///
    /// Checks run in order: `clear`/`sun`, then `rain`, then `cloud`.
    pub fn from_condition(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        if condition.contains("clear") || condition.contains("sun") {
            Theme::Sunny
        } else if condition.contains("rain") {
            Theme::Rainy
        } else if condition.contains("cloud") {
            Theme::Cloudy
        } else {
            Theme::Default
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::Rainy => "rainy",
            Theme::Cloudy => "cloudy",
            Theme::Default => "default",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
