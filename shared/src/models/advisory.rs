//! Agricultural advisories derived from current and next-day conditions
//!
//! Every refresh produces exactly one recommendation per category. The rules are
//! threshold checks over whole-number readings and hold no state between calls.

use serde::{Deserialize, Serialize};

use super::forecast::ForecastDay;
use super::weather::CurrentConditions;

/// Fixed advisory categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Irrigation,
    PestDisease,
    FieldOperations,
    Harvest,
}

impl RecommendationCategory {
    pub const ALL: [RecommendationCategory; 4] = [
        RecommendationCategory::Irrigation,
        RecommendationCategory::PestDisease,
        RecommendationCategory::FieldOperations,
        RecommendationCategory::Harvest,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            RecommendationCategory::Irrigation => "Irrigation Advisory",
            RecommendationCategory::PestDisease => "Pest Management",
            RecommendationCategory::FieldOperations => "Field Activities",
            RecommendationCategory::Harvest => "Harvest Planning",
        }
    }
}

/// Which rule fired for a category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    ReduceIrrigation,
    IncreaseIrrigation,
    MaintainIrrigation,
    FungalDiseaseRisk,
    PestActivityRisk,
    ModeratePestPressure,
    AvoidSpraying,
    IdealFieldConditions,
    SuitableFieldConditions,
    ExcellentHarvest,
    PostponeHarvest,
    ModerateHarvest,
}

impl Advice {
    pub fn category(&self) -> RecommendationCategory {
        match self {
            Advice::ReduceIrrigation | Advice::IncreaseIrrigation | Advice::MaintainIrrigation => {
                RecommendationCategory::Irrigation
            }
            Advice::FungalDiseaseRisk | Advice::PestActivityRisk | Advice::ModeratePestPressure => {
                RecommendationCategory::PestDisease
            }
            Advice::AvoidSpraying | Advice::IdealFieldConditions | Advice::SuitableFieldConditions => {
                RecommendationCategory::FieldOperations
            }
            Advice::ExcellentHarvest | Advice::PostponeHarvest | Advice::ModerateHarvest => {
                RecommendationCategory::Harvest
            }
        }
    }

    /// Action sentence appended to the recommendation body
    pub fn action(&self) -> &'static str {
        match self {
            Advice::ReduceIrrigation => "Reduce irrigation frequency.",
            Advice::IncreaseIrrigation => "Increase irrigation frequency.",
            Advice::MaintainIrrigation => "Maintain normal irrigation schedule.",
            Advice::FungalDiseaseRisk => {
                "Conditions are favorable for fungal diseases. Apply preventive fungicide measures."
            }
            Advice::PestActivityRisk => {
                "Hot, dry conditions favor pest activity. Inspect crops for insect damage."
            }
            Advice::ModeratePestPressure => {
                "Moderate pest and disease pressure. Continue routine field monitoring."
            }
            Advice::AvoidSpraying => "Not suitable for spraying; postpone pesticide application.",
            Advice::IdealFieldConditions => "Good conditions for all field activities.",
            Advice::SuitableFieldConditions => "Suitable for most field operations.",
            Advice::ExcellentHarvest => "Excellent for harvesting and drying.",
            Advice::PostponeHarvest => "Not suitable for harvesting, wait for drier weather.",
            Advice::ModerateHarvest => "Moderately suitable for harvesting.",
        }
    }
}

/// A human-readable recommendation for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub title: String,
    pub advice: Advice,
    pub body: String,
}

impl Recommendation {
    fn new(advice: Advice, body: String) -> Self {
        let category = advice.category();
        Self {
            category,
            title: category.title().to_string(),
            advice,
            body,
        }
    }
}

/// Readings the advisory rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Readings {
    temperature: i32,
    humidity: i32,
    wind_kmh: i32,
    cloud_cover: i32,
    next_day_precipitation: i32,
}

impl Readings {
    fn new(current: &CurrentConditions, next_day: Option<&ForecastDay>) -> Self {
        Self {
            temperature: current.temperature_celsius,
            humidity: current.humidity_percent,
            wind_kmh: current.wind_speed_kmh,
            cloud_cover: current.cloud_cover_percent,
            next_day_precipitation: next_day.map(|d| d.precipitation_probability).unwrap_or(0),
        }
    }
}

/// Generate one recommendation per category, in [`RecommendationCategory::ALL`] order.
pub fn generate_recommendations(
    current: &CurrentConditions,
    next_day: Option<&ForecastDay>,
) -> Vec<Recommendation> {
    let readings = Readings::new(current, next_day);
    vec![
        irrigation(&readings),
        pest_disease(&readings),
        field_operations(&readings),
        harvest(&readings),
    ]
}

fn irrigation(r: &Readings) -> Recommendation {
    let advice = if r.humidity > 70 {
        Advice::ReduceIrrigation
    } else if r.humidity < 40 {
        Advice::IncreaseIrrigation
    } else {
        Advice::MaintainIrrigation
    };
    let body = format!(
        "Humidity is {}% with a {}% chance of rain in the next forecast day. {}",
        r.humidity,
        r.next_day_precipitation,
        advice.action()
    );
    Recommendation::new(advice, body)
}

fn pest_disease(r: &Readings) -> Recommendation {
    let advice = if r.humidity > 75 && r.temperature > 25 {
        Advice::FungalDiseaseRisk
    } else if r.humidity < 50 && r.temperature > 30 {
        Advice::PestActivityRisk
    } else {
        Advice::ModeratePestPressure
    };
    let body = format!(
        "Temperature {}°C, humidity {}%. {}",
        r.temperature,
        r.humidity,
        advice.action()
    );
    Recommendation::new(advice, body)
}

fn field_operations(r: &Readings) -> Recommendation {
    let advice = if r.wind_kmh > 20 {
        Advice::AvoidSpraying
    } else if r.wind_kmh < 5 {
        Advice::IdealFieldConditions
    } else {
        Advice::SuitableFieldConditions
    };
    let body = format!(
        "Wind speed {} km/h at {}°C. {}",
        r.wind_kmh,
        r.temperature,
        advice.action()
    );
    Recommendation::new(advice, body)
}

fn harvest(r: &Readings) -> Recommendation {
    let advice = if r.cloud_cover < 30 && r.wind_kmh > 5 {
        Advice::ExcellentHarvest
    } else if r.cloud_cover > 70 || r.next_day_precipitation > 50 {
        Advice::PostponeHarvest
    } else {
        Advice::ModerateHarvest
    };
    let body = format!(
        "Cloud cover {}%, wind {} km/h, {}% chance of rain. {}",
        r.cloud_cover,
        r.wind_kmh,
        r.next_day_precipitation,
        advice.action()
    );
    Recommendation::new(advice, body)
}
