//! WebAssembly module for the AgriWeather platform
//!
//! Provides client-side computation for:
//! - Theme classification
//! - Daily forecast reduction
//! - Weather alerts and agricultural advisories
//! - Search input validation

use chrono::{DateTime, Utc};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Snapshot the browser already holds
#[derive(Debug, Deserialize)]
struct SnapshotInput {
    current: CurrentConditions,
    forecast: ProviderForecast,
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log_warning("AgriWeather WASM module loaded");
}

#[cfg(target_arch = "wasm32")]
fn log_warning(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log_warning(_message: &str) {}

fn parse<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| {
        let message = format!("Invalid {} JSON: {}", what, e);
        log_warning(&message);
        JsValue::from_str(&message)
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify a provider condition label into a theme name
#[wasm_bindgen]
pub fn classify_theme(condition: &str) -> String {
    Theme::from_condition(condition).to_string()
}

/// Reduce a provider forecast to at most five days
#[wasm_bindgen]
pub fn reduce_forecast_days(forecast_json: &str) -> Result<String, JsValue> {
    let forecast: ProviderForecast = parse(forecast_json, "forecast")?;
    to_json(&forecast.reduce())
}

/// Generate the four advisories from current conditions and the next forecast day
#[wasm_bindgen]
pub fn generate_advisories(
    current_json: &str,
    next_day_json: Option<String>,
) -> Result<String, JsValue> {
    let current: CurrentConditions = parse(current_json, "current conditions")?;
    let next_day: Option<ForecastDay> = match next_day_json.as_deref() {
        Some(json) => Some(parse(json, "forecast day")?),
        None => None,
    };
    to_json(&generate_recommendations(&current, next_day.as_ref()))
}

/// Derive the full weather bundle, anchoring alerts at `now_ms` (Unix milliseconds)
#[wasm_bindgen]
pub fn derive_weather_bundle_at(snapshot_json: &str, now_ms: f64) -> Result<String, JsValue> {
    let snapshot: SnapshotInput = parse(snapshot_json, "snapshot")?;
    let now = DateTime::<Utc>::from_timestamp_millis(now_ms as i64)
        .ok_or_else(|| JsValue::from_str("Invalid timestamp"))?;
    to_json(&WeatherBundle::derive(snapshot.current, &snapshot.forecast, now))
}

/// Derive the full weather bundle, anchoring alerts at the browser clock
#[wasm_bindgen]
pub fn derive_weather_bundle(snapshot_json: &str) -> Result<String, JsValue> {
    derive_weather_bundle_at(snapshot_json, js_sys::Date::now())
}

/// Validate a search box entry; returns the error message, if any
#[wasm_bindgen]
pub fn check_place_name(name: &str) -> Option<String> {
    validate_place_name(name).err().map(str::to_string)
}

/// Convert a wind speed in m/s to whole km/h
#[wasm_bindgen]
pub fn wind_speed_kmh(speed_mps: f64) -> i32 {
    mps_to_kmh(speed_mps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn current() -> Value {
        json!({
            "observed_at": "2026-10-15T06:00:00Z",
            "temperature_celsius": 37,
            "feels_like_celsius": 40,
            "humidity_percent": 30,
            "wind_speed_kmh": 8,
            "condition": "Clear",
            "description": "clear sky",
            "icon": "01d",
            "pressure_hpa": 1004,
            "visibility_km": 10,
            "cloud_cover_percent": 5,
            "sunrise": "2026-10-15T00:55:00Z",
            "sunset": "2026-10-15T12:30:00Z",
            "place_name": "Jaipur",
            "country": "IN",
            "coordinates": { "latitude": 26.9124, "longitude": 75.7873 }
        })
    }

    fn forecast() -> Value {
        json!({
            "timezone_offset_seconds": 19800,
            "points": [
                {
                    "timestamp": "2026-10-15T06:00:00Z",
                    "temp_max_celsius": 38.4,
                    "temp_min_celsius": 27.5,
                    "condition": "Clear",
                    "description": "clear sky",
                    "icon": "01d",
                    "pop": 0.05,
                    "wind_speed_mps": 2.0
                },
                {
                    "timestamp": "2026-10-16T06:00:00Z",
                    "temp_max_celsius": 36.0,
                    "temp_min_celsius": 26.0,
                    "condition": "Clouds",
                    "description": "few clouds",
                    "icon": "02d",
                    "pop": null,
                    "wind_speed_mps": 4.0
                }
            ]
        })
    }

    #[test]
    fn test_classify_theme() {
        assert_eq!(classify_theme("Clear"), "sunny");
        assert_eq!(classify_theme("Rain"), "rainy");
        assert_eq!(classify_theme("Clouds"), "cloudy");
        assert_eq!(classify_theme("Mist"), "default");
    }

    #[test]
    fn test_reduce_forecast_days() {
        let days: Value =
            serde_json::from_str(&reduce_forecast_days(&forecast().to_string()).unwrap()).unwrap();
        let days = days.as_array().unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["high_celsius"], 38);
        assert_eq!(days[0]["low_celsius"], 28);
        assert_eq!(days[1]["precipitation_probability"], 0);
    }

    #[test]
    fn test_generate_advisories_without_forecast() {
        let recs: Value =
            serde_json::from_str(&generate_advisories(&current().to_string(), None).unwrap())
                .unwrap();
        let recs = recs.as_array().unwrap();
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0]["advice"], "increase_irrigation");
        assert_eq!(recs[1]["advice"], "pest_activity_risk");
        assert_eq!(recs[3]["advice"], "excellent_harvest");
    }

    #[test]
    fn test_derive_bundle_raises_heat_wave() {
        let snapshot = json!({ "current": current(), "forecast": forecast() }).to_string();
        let now_ms = 1_792_044_000_000.0;
        let bundle: Value =
            serde_json::from_str(&derive_weather_bundle_at(&snapshot, now_ms).unwrap()).unwrap();

        assert_eq!(bundle["theme"], "sunny");
        assert_eq!(bundle["location"], "Jaipur, IN");
        assert_eq!(bundle["alerts"][0]["title"], "Heat Wave Warning");
        assert_eq!(bundle["alerts"][0]["severity"], "severe");
        assert_eq!(bundle["alerts"][0]["id"], "heat-wave-1792044000");
    }

    #[test]
    fn test_check_place_name() {
        assert_eq!(check_place_name("Jaipur"), None);
        assert!(check_place_name("  ").is_some());
    }

    #[test]
    fn test_wind_speed_kmh() {
        assert_eq!(wind_speed_kmh(5.0), 18);
    }
}
