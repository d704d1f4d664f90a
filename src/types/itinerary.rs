use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value upstream models and the mock use for a slot that does not apply.
pub const NOT_APPLICABLE: &str = "N/A";

/// Structured travel itinerary produced by an upstream model or the mock generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[completion_schema(name = "Itinerary")]
pub struct ItineraryRecord {
    /// Destination city and country (e.g., "Kyoto, Japan")
    pub destination: String,
    /// Trip length as free text (e.g., "3 days/2 nights")
    pub duration: String,
    /// Spending tier for the trip
    pub budget_level: BudgetLevel,
    /// Best time of year to travel (season or months)
    pub best_season: String,
    /// Rough total cost range (e.g., "$800-$1200")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    /// Must-see experiences, most important first
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Day-by-day plan ordered by day number
    #[serde(rename = "itinerary")]
    pub day_plans: Vec<DayPlan>,
    /// Things worth packing
    #[serde(default)]
    pub packing_tips: Vec<String>,
    /// Dishes or drinks to try
    #[serde(default)]
    pub local_cuisine: Vec<String>,
    /// Safety advice for the destination
    #[serde(default)]
    pub safety_notes: Vec<String>,
    /// Prompt a locally generated record was built for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_for: Option<String>,
}

/// Plan for a single day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayPlan {
    /// 1-based day counter, unique within the itinerary
    pub day: u32,
    /// Short theme for the day
    pub theme: String,
    /// Morning activity, or "N/A"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<String>,
    /// Afternoon activity, or "N/A"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<String>,
    /// Evening activity, or "N/A"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<String>,
    /// Where to stay that night, or "N/A"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<String>,
}

impl DayPlan {
    pub fn morning(&self) -> Option<&str> {
        applicable(&self.morning)
    }

    pub fn afternoon(&self) -> Option<&str> {
        applicable(&self.afternoon)
    }

    pub fn evening(&self) -> Option<&str> {
        applicable(&self.evening)
    }

    pub fn accommodation(&self) -> Option<&str> {
        applicable(&self.accommodation)
    }
}

fn applicable(slot: &Option<String>) -> Option<&str> {
    slot.as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty() && *text != NOT_APPLICABLE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BudgetLevel {
    Budget,
    #[serde(rename = "Mid-range")]
    MidRange,
    Luxury,
}

impl BudgetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Budget => "Budget",
            BudgetLevel::MidRange => "Mid-range",
            BudgetLevel::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
