//! Common types and unit conversions used across the platform

use serde::{Deserialize, Serialize};

/// Visibility reported when the provider omits the field
pub const DEFAULT_VISIBILITY_KM: i32 = 10;

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Round to the nearest integer, with halves going up (2.5 -> 3, -2.5 -> -2)
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Convert meters per second to whole kilometers per hour
pub fn mps_to_kmh(speed_mps: f64) -> i32 {
    round_half_up(speed_mps * 3.6)
}

/// Convert a visibility distance in meters to whole kilometers
pub fn visibility_km(visibility_meters: Option<f64>) -> i32 {
    match visibility_meters {
        Some(meters) => round_half_up(meters / 1000.0),
        None => DEFAULT_VISIBILITY_KM,
    }
}

/// Convert a 0-1 probability of precipitation to a 0-100 percentage
pub fn pop_to_percent(pop: Option<f64>) -> i32 {
    round_half_up(pop.unwrap_or(0.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
    }

    #[test]
    fn test_wind_conversion() {
        assert_eq!(mps_to_kmh(0.0), 0);
        assert_eq!(mps_to_kmh(5.0), 18);
        // 3.47 m/s = 12.492 km/h
        assert_eq!(mps_to_kmh(3.47), 12);
    }

    #[test]
    fn test_visibility_defaults_to_ten_km() {
        assert_eq!(visibility_km(None), 10);
        assert_eq!(visibility_km(Some(6500.0)), 7);
        assert_eq!(visibility_km(Some(10000.0)), 10);
    }

    #[test]
    fn test_pop_to_percent() {
        assert_eq!(pop_to_percent(None), 0);
        assert_eq!(pop_to_percent(Some(0.0)), 0);
        assert_eq!(pop_to_percent(Some(0.76)), 76);
        assert_eq!(pop_to_percent(Some(1.0)), 100);
    }
}
