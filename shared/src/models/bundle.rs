//! The derived output of one successful refresh

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::advisory::{generate_recommendations, Recommendation};
use super::alert::{derive_alerts, Alert};
use super::forecast::{ForecastDay, ProviderForecast};
use super::weather::{CurrentConditions, Theme};

/// Everything the presentation layer shows for a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherBundle {
    pub location: String,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
    pub alerts: Vec<Alert>,
    pub theme: Theme,
    pub recommendations: Vec<Recommendation>,
}

impl WeatherBundle {
    /// Derive the full bundle from a fetched snapshot.
    ///
    /// `now` anchors alert validity windows; every other field depends only on the
    /// snapshot.
    pub fn derive(
        current: CurrentConditions,
        forecast: &ProviderForecast,
        now: DateTime<Utc>,
    ) -> Self {
        let days = forecast.reduce();
        let alerts = derive_alerts(&current, &days, now);
        let recommendations = generate_recommendations(&current, days.first());

        Self {
            location: current.location_label(),
            theme: current.theme(),
            current,
            forecast: days,
            alerts,
            recommendations,
        }
    }
}
