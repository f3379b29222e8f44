//! Configuration management for the AgriWeather server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRI__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Viewer authorization configuration
    pub auth: AuthConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Device geolocation limits
    pub geolocation: GeolocationConfig,

    /// Log output format ("pretty" or "json")
    pub log_format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret used to verify viewer JWTs (HS256)
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint (current conditions and forecast)
    pub api_endpoint: String,

    /// Geocoding API endpoint
    pub geo_endpoint: String,

    /// Weather API key; refreshes fail with a configuration error when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout for provider calls
    pub timeout_seconds: u64,

    /// Place used when device geolocation is unavailable
    pub default_location: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeolocationConfig {
    /// How long to wait for a device fix
    pub timeout_seconds: u64,

    /// Oldest cached device fix that is still accepted
    pub maximum_age_seconds: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRI__ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("auth.jwt_secret", "development-secret-key")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.geo_endpoint", "https://api.openweathermap.org/geo/1.0")?
            .set_default("weather.timeout_seconds", 20)?
            .set_default("weather.default_location", "New Delhi")?
            .set_default("geolocation.timeout_seconds", 10)?
            .set_default("geolocation.maximum_age_seconds", 600)?
            .set_default("log_format", "pretty")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRI__ prefix)
            .add_source(Environment::with_prefix("AGRI").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            maximum_age_seconds: 600,
        }
    }
}
