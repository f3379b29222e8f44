//! Weather alert models and alert derivation

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::forecast::ForecastDay;
use super::weather::CurrentConditions;

/// Temperature above which a heat wave warning is raised (°C)
pub const HEAT_WAVE_THRESHOLD_CELSIUS: i32 = 35;

/// First-day precipitation probability above which heavy rain is expected (%)
pub const HEAVY_RAIN_THRESHOLD_PERCENT: i32 = 70;

/// How long a derived alert stays valid
pub const ALERT_VALIDITY_HOURS: i64 = 24;

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Extreme,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Minor => write!(f, "minor"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Severe => write!(f, "severe"),
            Severity::Extreme => write!(f, "extreme"),
        }
    }
}

/// Kinds of alerts the classifier can raise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HeatWave,
    HeavyRain,
}

impl AlertKind {
    pub fn slug(&self) -> &'static str {
        match self {
            AlertKind::HeatWave => "heat-wave",
            AlertKind::HeavyRain => "heavy-rain",
        }
    }

    pub fn event(&self) -> &'static str {
        match self {
            AlertKind::HeatWave => "Heat Wave",
            AlertKind::HeavyRain => "Heavy Rain",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::HeatWave => "Heat Wave Warning",
            AlertKind::HeavyRain => "Heavy Rain Expected",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AlertKind::HeatWave => Severity::Severe,
            AlertKind::HeavyRain => Severity::Moderate,
        }
    }
}

/// A weather alert valid for a bounded window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub event: String,
}

impl Alert {
    fn new(kind: AlertKind, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}-{}", kind.slug(), now.timestamp()),
            kind,
            title: kind.title().to_string(),
            description,
            severity: kind.severity(),
            starts_at: now,
            ends_at: now + Duration::hours(ALERT_VALIDITY_HOURS),
            event: kind.event().to_string(),
        }
    }

    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.starts_at && instant < self.ends_at
    }
}

/// Derive the alerts for a refresh.
///
/// Heat takes priority over rain; at most one alert is returned.
pub fn derive_alerts(
    current: &CurrentConditions,
    forecast: &[ForecastDay],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    if current.temperature_celsius > HEAT_WAVE_THRESHOLD_CELSIUS {
        let description = format!(
            "Temperature has reached {}°C. Avoid field work during peak afternoon hours \
             and make sure crops and livestock have enough water.",
            current.temperature_celsius
        );
        return vec![Alert::new(AlertKind::HeatWave, description, now)];
    }

    match forecast.first() {
        Some(day) if day.precipitation_probability > HEAVY_RAIN_THRESHOLD_PERCENT => {
            let description = format!(
                "{}% chance of rain on {}. Clear field drainage and postpone fertilizer \
                 application.",
                day.precipitation_probability, day.label
            );
            vec![Alert::new(AlertKind::HeavyRain, description, now)]
        }
        _ => Vec::new(),
    }
}
