//! Location resolution
//!
//! Turns a place name or a device position into coordinates. Device positions
//! come from a [`Geolocator`]; when one cannot produce a fresh fix in time the
//! resolver falls back to the configured default place.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::GeolocationConfig;
use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;
use crate::models::{validate_coordinates, validate_place_name, Coordinates};

/// Limits applied when asking a geolocator for a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    /// How long to wait for a fix
    pub timeout: Duration,
    /// Oldest fix that is still accepted
    pub maximum_age: Duration,
}

impl From<&GeolocationConfig> for GeolocationOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_seconds),
            maximum_age: Duration::from_secs(config.maximum_age_seconds),
        }
    }
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self::from(&GeolocationConfig::default())
    }
}

/// A device fix and when it was taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePosition {
    pub coordinates: Coordinates,
    pub captured_at: DateTime<Utc>,
}

impl DevicePosition {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.captured_at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Source of device positions
#[axum::async_trait]
pub trait Geolocator: Send + Sync {
    /// Ask for the current position. Failures are `AppError::Capability`.
    async fn current_position(&self, options: &GeolocationOptions) -> AppResult<DevicePosition>;
}

/// The position a client reported, or why it could not get one
#[derive(Debug, Clone)]
pub struct ReportedPosition(Result<DevicePosition, String>);

impl ReportedPosition {
    pub fn fix(position: DevicePosition) -> Self {
        Self(Ok(position))
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self(Err(reason.into()))
    }
}

#[axum::async_trait]
impl Geolocator for ReportedPosition {
    async fn current_position(&self, _options: &GeolocationOptions) -> AppResult<DevicePosition> {
        self.0.clone().map_err(AppError::Capability)
    }
}

/// Geolocator for hosts without a positioning device
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[axum::async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self, _options: &GeolocationOptions) -> AppResult<DevicePosition> {
        Err(AppError::Capability(
            "Geolocation is not available on this host".to_string(),
        ))
    }
}

/// What a refresh should resolve
#[derive(Clone)]
pub enum LocationIntent {
    /// A free-text place name
    Place(String),
    /// The device position, asked for anew on every resolution
    Device(Arc<dyn Geolocator>),
}

impl fmt::Debug for LocationIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationIntent::Place(name) => f.debug_tuple("Place").field(name).finish(),
            LocationIntent::Device(_) => f.write_str("Device"),
        }
    }
}

/// Resolves location intents into coordinates
#[derive(Clone)]
pub struct LocationResolver {
    client: WeatherClient,
    default_location: String,
    options: GeolocationOptions,
}

impl LocationResolver {
    pub fn new(client: WeatherClient, default_location: String, options: GeolocationOptions) -> Self {
        Self {
            client,
            default_location,
            options,
        }
    }

    pub async fn resolve(&self, intent: &LocationIntent) -> AppResult<Coordinates> {
        match intent {
            LocationIntent::Place(name) => self.resolve_place(name).await,
            LocationIntent::Device(geolocator) => self.resolve_device(geolocator.as_ref()).await,
        }
    }

    /// Geocode a place name, taking the first match
    pub async fn resolve_place(&self, name: &str) -> AppResult<Coordinates> {
        let name = validate_place_name(name).map_err(|msg| AppError::validation("city", msg))?;

        match self.client.geocode(name).await? {
            Some(place) => {
                tracing::debug!(
                    query = name,
                    place = %place.name,
                    coordinates = %place.coordinates,
                    "Resolved place name"
                );
                Ok(place.coordinates)
            }
            None => Err(AppError::NotFound(name.to_string())),
        }
    }

    /// Use the device position, or the default place when it is unavailable
    pub async fn resolve_device(&self, geolocator: &dyn Geolocator) -> AppResult<Coordinates> {
        match self.device_position(geolocator).await {
            Ok(position) => {
                tracing::debug!(coordinates = %position.coordinates, "Using device position");
                Ok(position.coordinates)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    fallback = %self.default_location,
                    "Device position unavailable, using default location"
                );
                self.resolve_place(&self.default_location).await
            }
        }
    }

    async fn device_position(&self, geolocator: &dyn Geolocator) -> AppResult<DevicePosition> {
        let position = tokio::time::timeout(
            self.options.timeout,
            geolocator.current_position(&self.options),
        )
        .await
        .map_err(|_| AppError::Capability("Timed out waiting for device position".to_string()))??;

        if position.age(Utc::now()) > self.options.maximum_age {
            return Err(AppError::Capability("Device position is too old".to_string()));
        }
        validate_coordinates(&position.coordinates)
            .map_err(|msg| AppError::Capability(msg.to_string()))?;

        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::weather::tests::geocode_body;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Never answers
    struct SilentGeolocator;

    #[axum::async_trait]
    impl Geolocator for SilentGeolocator {
        async fn current_position(
            &self,
            _options: &GeolocationOptions,
        ) -> AppResult<DevicePosition> {
            std::future::pending().await
        }
    }

    fn resolver(server: &MockServer, options: GeolocationOptions) -> LocationResolver {
        let client = WeatherClient::with_base_url(
            "test-key".to_string(),
            format!("{}/data/2.5", server.uri()),
            format!("{}/geo/1.0", server.uri()),
        );
        LocationResolver::new(client, "New Delhi".to_string(), options)
    }

    async fn mount_default_place(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "New Delhi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "New Delhi", "lat": 28.6139, "lon": 77.209, "country": "IN" }
            ])))
            .expect(1)
            .mount(server)
            .await;
    }

    fn fresh_fix() -> DevicePosition {
        DevicePosition {
            coordinates: Coordinates::new(18.5204, 73.8567),
            captured_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_place_name_resolves_to_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Ludhiana"))
            .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body()))
            .mount(&server)
            .await;

        let coordinates = assert_ok!(
            resolver(&server, GeolocationOptions::default())
                .resolve(&LocationIntent::Place("  Ludhiana ".to_string()))
                .await
        );
        assert_eq!(coordinates, Coordinates::new(30.901, 75.8573));
    }

    #[tokio::test]
    async fn test_unknown_place_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = assert_err!(
            resolver(&server, GeolocationOptions::default())
                .resolve_place("Nonexistentville")
                .await
        );
        assert_eq!(err.user_message(), "Location not found: Nonexistentville");
    }

    #[tokio::test]
    async fn test_blank_place_is_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let err = assert_err!(
            resolver(&server, GeolocationOptions::default())
                .resolve_place("   ")
                .await
        );
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_fresh_device_fix_is_used() {
        let server = MockServer::start().await;
        let coordinates = assert_ok!(
            resolver(&server, GeolocationOptions::default())
                .resolve_device(&ReportedPosition::fix(fresh_fix()))
                .await
        );
        assert_eq!(coordinates, Coordinates::new(18.5204, 73.8567));
    }

    #[tokio::test]
    async fn test_denied_geolocation_falls_back_to_default() {
        let server = MockServer::start().await;
        mount_default_place(&server).await;

        let coordinates = assert_ok!(
            resolver(&server, GeolocationOptions::default())
                .resolve_device(&ReportedPosition::failed("User denied Geolocation"))
                .await
        );
        assert_eq!(coordinates, Coordinates::new(28.6139, 77.209));
    }

    #[tokio::test]
    async fn test_missing_device_falls_back_to_default() {
        let server = MockServer::start().await;
        mount_default_place(&server).await;

        let coordinates = assert_ok!(
            resolver(&server, GeolocationOptions::default())
                .resolve_device(&NoGeolocation)
                .await
        );
        assert_eq!(coordinates, Coordinates::new(28.6139, 77.209));
    }

    #[tokio::test]
    async fn test_stale_fix_falls_back_to_default() {
        let server = MockServer::start().await;
        mount_default_place(&server).await;

        let stale = DevicePosition {
            captured_at: Utc::now() - chrono::Duration::minutes(11),
            ..fresh_fix()
        };
        let coordinates = assert_ok!(
            resolver(&server, GeolocationOptions::default())
                .resolve_device(&ReportedPosition::fix(stale))
                .await
        );
        assert_eq!(coordinates, Coordinates::new(28.6139, 77.209));
    }

    #[tokio::test]
    async fn test_slow_geolocator_times_out_to_default() {
        let server = MockServer::start().await;
        mount_default_place(&server).await;

        let options = GeolocationOptions {
            timeout: Duration::from_millis(20),
            ..GeolocationOptions::default()
        };
        let coordinates = assert_ok!(
            resolver(&server, options)
                .resolve_device(&SilentGeolocator)
                .await
        );
        assert_eq!(coordinates, Coordinates::new(28.6139, 77.209));
    }

    #[test]
    fn test_options_from_config() {
        let options = GeolocationOptions::from(&GeolocationConfig {
            timeout_seconds: 10,
            maximum_age_seconds: 600,
        });
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(600));
    }
}
