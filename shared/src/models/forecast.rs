//! Forecast models and the daily forecast reducer

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{mps_to_kmh, pop_to_percent, round_half_up};

/// Maximum number of days kept in a reduced forecast
pub const MAX_FORECAST_DAYS: usize = 5;

/// One sub-daily point as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub temp_max_celsius: f64,
    pub temp_min_celsius: f64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation (0-1)
    pub pop: Option<f64>,
    pub wind_speed_mps: f64,
}

/// Raw provider forecast together with the location's UTC offset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderForecast {
    pub timezone_offset_seconds: i32,
    pub points: Vec<ForecastPoint>,
}

impl ProviderForecast {
    /// Offset used to bucket points into local calendar dates
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    pub fn reduce(&self) -> Vec<ForecastDay> {
        reduce_forecast(&self.points, self.utc_offset())
    }
}

/// One calendar day of a reduced forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Short display label, e.g. "Mon, Oct 14"
    pub label: String,
    pub high_celsius: i32,
    pub low_celsius: i32,
    pub condition: String,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation (0-100)
    pub precipitation_probability: i32,
    pub wind_speed_kmh: i32,
}

impl ForecastDay {
    /// Open a day from the first point seen for its date
    fn open(date: NaiveDate, point: &ForecastPoint) -> Self {
        Self {
            date,
            label: date.format("%a, %b %-d").to_string(),
            high_celsius: round_half_up(point.temp_max_celsius),
            low_celsius: round_half_up(point.temp_min_celsius),
            condition: point.condition.clone(),
            description: point.description.clone(),
            icon: point.icon.clone(),
            precipitation_probability: pop_to_percent(point.pop),
            wind_speed_kmh: mps_to_kmh(point.wind_speed_mps),
        }
    }
}

/// Collapse sub-daily points into at most five days, in order of first appearance.
///
/// Each day keeps the figures of the first point seen for its date; later points
/// of the same date are ignored rather than aggregated.
pub fn reduce_forecast(points: &[ForecastPoint], offset: FixedOffset) -> Vec<ForecastDay> {
    let mut days: Vec<ForecastDay> = Vec::with_capacity(MAX_FORECAST_DAYS);

    for point in points {
        let date = point.timestamp.with_timezone(&offset).date_naive();
        if days.iter().any(|day| day.date == date) {
            continue;
        }
        if days.len() == MAX_FORECAST_DAYS {
            break;
        }
        days.push(ForecastDay::open(date, point));
    }

    days
}
