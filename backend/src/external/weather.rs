//! Weather API client for fetching weather data
//!
//! Integrates with OpenWeatherMap for geocoding, current conditions and forecasts

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    mps_to_kmh, round_half_up, visibility_km, Coordinates, CurrentConditions, ForecastPoint,
    ProviderForecast,
};

const CURRENT_CONTEXT: &str = "Failed to fetch current weather";
const FORECAST_CONTEXT: &str = "Failed to fetch weather forecast";
const GEOCODE_CONTEXT: &str = "Failed to look up location";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    geo_url: String,
}

/// First geocoding match for a place name
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

/// OpenWeatherMap geocoding match
#[derive(Debug, Deserialize)]
struct OWMGeocodeMatch {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    coord: OWMCoord,
    #[serde(default)]
    weather: Vec<OWMWeather>,
    main: OWMCurrentMain,
    visibility: Option<f64>,
    wind: OWMWind,
    #[serde(default)]
    clouds: OWMClouds,
    dt: i64,
    sys: OWMSys,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OWMCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OWMCurrentMain {
    temp: f64,
    feels_like: f64,
    pressure: i32,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OWMForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OWMClouds {
    all: i32,
}

#[derive(Debug, Deserialize)]
struct OWMSys {
    #[serde(default)]
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    city: Option<OWMCity>,
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMCity {
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMForecastMain,
    #[serde(default)]
    weather: Vec<OWMWeather>,
    wind: OWMWind,
    pop: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(api_key: String, config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            geo_url: config.geo_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new WeatherClient with custom base URLs (for testing)
    pub fn with_base_url(api_key: String, base_url: String, geo_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            geo_url,
        }
    }

    /// Forward-geocode a place name, asking for a single match
    pub async fn geocode(&self, name: &str) -> AppResult<Option<GeocodedPlace>> {
        let url = format!("{}/direct", self.geo_url);
        let matches: Vec<OWMGeocodeMatch> = self
            .get_json(&url, &[("q", name), ("limit", "1")], GEOCODE_CONTEXT)
            .await?;

        Ok(matches.into_iter().next().map(|m| GeocodedPlace {
            name: m.name,
            country: m.country,
            coordinates: Coordinates::new(m.lat, m.lon),
        }))
    }

    /// Fetch current weather conditions by coordinates
    pub async fn get_current_weather(
        &self,
        coordinates: Coordinates,
    ) -> AppResult<CurrentConditions> {
        let url = format!("{}/weather", self.base_url);
        let (lat, lon) = (coordinates.latitude.to_string(), coordinates.longitude.to_string());
        let data: OWMCurrentResponse = self
            .get_json(
                &url,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")],
                CURRENT_CONTEXT,
            )
            .await?;

        Ok(convert_current_response(data))
    }

    /// Fetch the sub-daily forecast by coordinates
    pub async fn get_forecast(&self, coordinates: Coordinates) -> AppResult<ProviderForecast> {
        let url = format!("{}/forecast", self.base_url);
        let (lat, lon) = (coordinates.latitude.to_string(), coordinates.longitude.to_string());
        let data: OWMForecastResponse = self
            .get_json(
                &url,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")],
                FORECAST_CONTEXT,
            )
            .await?;

        Ok(convert_forecast_response(data))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        context: &'static str,
    ) -> AppResult<T> {
        tracing::debug!(url = %url, ?query, "Requesting weather provider");

        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::upstream(context, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(context, format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::upstream(context, format!("failed to parse response: {}", e)))
    }
}

fn timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_else(Utc::now)
}

/// Convert OpenWeatherMap current response to our format
fn convert_current_response(data: OWMCurrentResponse) -> CurrentConditions {
    let weather = data.weather.first();

    CurrentConditions {
        observed_at: timestamp(data.dt),
        temperature_celsius: round_half_up(data.main.temp),
        feels_like_celsius: round_half_up(data.main.feels_like),
        humidity_percent: data.main.humidity,
        wind_speed_kmh: mps_to_kmh(data.wind.speed),
        condition: weather.map(|w| w.main.clone()).unwrap_or_default(),
        description: weather.map(|w| w.description.clone()).unwrap_or_default(),
        icon: weather.map(|w| w.icon.clone()).unwrap_or_default(),
        pressure_hpa: data.main.pressure,
        visibility_km: visibility_km(data.visibility),
        cloud_cover_percent: data.clouds.all,
        sunrise: timestamp(data.sys.sunrise),
        sunset: timestamp(data.sys.sunset),
        place_name: data.name,
        country: data.sys.country.unwrap_or_default(),
        coordinates: Coordinates::new(data.coord.lat, data.coord.lon),
    }
}

/// Convert OpenWeatherMap forecast response to our format
fn convert_forecast_response(data: OWMForecastResponse) -> ProviderForecast {
    let points = data
        .list
        .into_iter()
        .map(|item| {
            let weather = item.weather.first();
            ForecastPoint {
                timestamp: timestamp(item.dt),
                temp_max_celsius: item.main.temp_max,
                temp_min_celsius: item.main.temp_min,
                condition: weather.map(|w| w.main.clone()).unwrap_or_default(),
                description: weather.map(|w| w.description.clone()).unwrap_or_default(),
                icon: weather.map(|w| w.icon.clone()).unwrap_or_default(),
                pop: item.pop,
                wind_speed_mps: item.wind.speed,
            }
        })
        .collect();

    ProviderForecast {
        timezone_offset_seconds: data.city.and_then(|c| c.timezone).unwrap_or(0),
        points,
    }
}
