//! Network-free itinerary generation.
//!
//! Used when no upstream credential is configured or every candidate model
//! failed. The output always satisfies the itinerary schema.

use crate::types::{BudgetLevel, DayPlan, ItineraryRecord};

const GENERIC_DESTINATION: &str = "Custom Destination";

/// Known destinations, checked in order; the first keyword hit wins.
struct DestinationRule {
    keywords: &'static [&'static str],
    destination: &'static str,
    highlights: &'static [&'static str],
    local_cuisine: &'static [&'static str],
}

const DESTINATION_RULES: &[DestinationRule] = &[
    DestinationRule {
        keywords: &["kyoto", "japan"],
        destination: "Kyoto, Japan",
        highlights: &["Kinkaku-ji Temple", "Fushimi Inari Shrine", "Arashiyama"],
        local_cuisine: &["Matcha desserts", "Kaiseki", "Sushi"],
    },
    DestinationRule {
        keywords: &["paris", "france"],
        destination: "Paris, France",
        highlights: &["Eiffel Tower", "Louvre", "Notre-Dame"],
        local_cuisine: &["Croissants", "Escargot", "Wine"],
    },
    DestinationRule {
        keywords: &["bali"],
        destination: "Bali, Indonesia",
        highlights: &["Rice Terraces", "Beaches", "Temples"],
        local_cuisine: &["Nasi Goreng", "Satay", "Fresh fruit"],
    },
];

/// Build a canned itinerary for `prompt`.
///
/// Matching is a case-insensitive substring test, so "Tokyo" does not match
/// the Kyoto rule and gets the generic template.
pub fn generate_mock_itinerary(prompt: &str) -> ItineraryRecord {
    let mut record = generic_itinerary(prompt);

    if let Some(rule) = match_rule(prompt) {
        record.destination = rule.destination.to_string();
        record.highlights = owned(rule.highlights);
        record.local_cuisine = owned(rule.local_cuisine);
    }

    record
}

/// Destination the mock would pick for `prompt`, if any rule matches.
pub fn matched_destination(prompt: &str) -> Option<&'static str> {
    match_rule(prompt).map(|rule| rule.destination)
}

fn match_rule(prompt: &str) -> Option<&'static DestinationRule> {
    let lowered = prompt.to_lowercase();
    DESTINATION_RULES.iter().find(|rule| {
        rule.keywords
            .iter()
            .any(|keyword| lowered.contains(keyword))
    })
}

fn generic_itinerary(prompt: &str) -> ItineraryRecord {
    ItineraryRecord {
        destination: GENERIC_DESTINATION.to_string(),
        duration: "3 days".to_string(),
        budget_level: BudgetLevel::MidRange,
        best_season: "Spring/Fall".to_string(),
        estimated_cost: Some("$800-$1200".to_string()),
        highlights: owned(&["Local attractions", "Cultural experiences"]),
        day_plans: vec![
            DayPlan {
                day: 1,
                theme: "Arrival & Exploration".to_string(),
                morning: Some("Check into accommodation".to_string()),
                afternoon: Some("Explore local area".to_string()),
                evening: Some("Welcome dinner".to_string()),
                accommodation: Some("Hotel in city center".to_string()),
            },
            DayPlan {
                day: 2,
                theme: "Main Attractions".to_string(),
                morning: Some("Visit top attractions".to_string()),
                afternoon: Some("Cultural experience".to_string()),
                evening: Some("Local cuisine".to_string()),
                accommodation: Some("Hotel in city center".to_string()),
            },
        ],
        packing_tips: owned(&["Comfortable shoes", "Weather-appropriate clothing"]),
        local_cuisine: owned(&["Local specialty 1", "Local specialty 2"]),
        safety_notes: owned(&["Keep valuables secure"]),
        generated_for: Some(prompt.to_string()),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
