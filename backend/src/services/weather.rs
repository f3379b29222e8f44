//! Weather service for fetching provider snapshots

use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::external::WeatherClient;
use crate::models::{Coordinates, CurrentConditions, ProviderForecast, WeatherBundle};

/// Weather service for fetching current conditions and forecasts together
#[derive(Clone)]
pub struct WeatherService {
    weather_client: WeatherClient,
}

/// Current conditions and raw forecast fetched for one location
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub forecast: ProviderForecast,
}

impl WeatherSnapshot {
    /// Derive the forecast days, theme, alerts and recommendations
    pub fn into_bundle(self, now: DateTime<Utc>) -> WeatherBundle {
        WeatherBundle::derive(self.current, &self.forecast, now)
    }
}

impl WeatherService {
    pub fn new(weather_client: WeatherClient) -> Self {
        Self { weather_client }
    }

    /// Fetch current conditions and forecast concurrently; both must succeed
    pub async fn fetch_snapshot(&self, coordinates: Coordinates) -> AppResult<WeatherSnapshot> {
        let (current, forecast) = tokio::try_join!(
            self.weather_client.get_current_weather(coordinates),
            self.weather_client.get_forecast(coordinates),
        )?;

        tracing::info!(
            location = %current.location_label(),
            forecast_points = forecast.points.len(),
            "Fetched weather snapshot"
        );

        Ok(WeatherSnapshot { current, forecast })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::external::weather::tests::{current_body, forecast_body};
    use chrono::TimeZone;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> WeatherService {
        WeatherService::new(WeatherClient::with_base_url(
            "test-key".to_string(),
            format!("{}/data/2.5", server.uri()),
            format!("{}/geo/1.0", server.uri()),
        ))
    }

    #[tokio::test]
    async fn test_snapshot_derives_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let snapshot = assert_ok!(
            service(&server)
                .fetch_snapshot(Coordinates::new(30.901, 75.8573))
                .await
        );
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 6, 0, 0).unwrap();
        let bundle = snapshot.into_bundle(now);

        assert_eq!(bundle.location, "Ludhiana, IN");
        assert_eq!(bundle.forecast.len(), 5);
        assert_eq!(bundle.recommendations.len(), 4);
        // 60% chance of rain stays under the heavy rain threshold
        assert!(bundle.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_forecast_failure_fails_whole_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = assert_err!(
            service(&server)
                .fetch_snapshot(Coordinates::new(30.901, 75.8573))
                .await
        );
        assert!(matches!(err, AppError::Upstream { .. }));
        assert_eq!(err.user_message(), "Failed to fetch weather forecast");
    }
}
