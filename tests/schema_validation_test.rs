use schemars::JsonSchema;
use serde::Deserialize;
use trip_planner_rs::{
    completion_schema,
    schemas::{parse_structured, validation::validate_against_schema},
    CompletionSchema, ItineraryRecord,
};

/// A packing checklist for one traveler
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[completion_schema(name = "Checklist")]
struct PackingChecklist {
    /// Name of the traveler
    traveler_name: String,
    /// Items to pack
    #[serde(rename = "items")]
    packing_items: Vec<String>,
    /// Checked-bag limit in kilograms
    #[serde(default)]
    bag_limit_kg: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[allow(dead_code)]
#[completion_schema(description = "Overridden description")]
struct Visa {
    /// Country issuing the visa
    country: String,
}

#[test]
fn test_schema_name_and_description() {
    let handle = PackingChecklist::schema();
    assert_eq!(handle.schema_name(), "Checklist");
    assert_eq!(handle.type_name(), "PackingChecklist");
    assert_eq!(
        handle.schema_json()["description"],
        "A packing checklist for one traveler"
    );

    let visa = Visa::schema();
    assert_eq!(visa.schema_name(), "Visa");
    assert_eq!(visa.schema_json()["description"], "Overridden description");
}

#[test]
fn test_field_docs_follow_serde_names() {
    let schema = PackingChecklist::schema().schema_json();
    let props = schema["properties"].as_object().unwrap();

    assert_eq!(props["travelerName"]["description"], "Name of the traveler");
    assert_eq!(props["items"]["description"], "Items to pack");
    assert!(props.contains_key("bagLimitKg"));
    assert!(!props.contains_key("packing_items"));
}

#[test]
fn test_parse_structured_accepts_valid_payload() {
    let checklist: PackingChecklist =
        parse_structured(r#"{"travelerName": "Ana", "items": ["passport", "adapter"]}"#).unwrap();
    assert_eq!(checklist.traveler_name, "Ana");
    assert_eq!(checklist.packing_items.len(), 2);
    assert!(checklist.bag_limit_kg.is_none());
}

#[test]
fn test_parse_structured_reports_schema_path() {
    let err = parse_structured::<PackingChecklist>(r#"{"travelerName": "Ana", "items": [3]}"#)
        .unwrap_err();
    assert!(err.reason.contains("/items/0"), "{}", err.reason);
    assert_eq!(err.text, r#"{"travelerName": "Ana", "items": [3]}"#);
}

#[test]
fn test_itinerary_schema_rejects_wrong_types() {
    let payload = serde_json::json!({
        "destination": "Rome, Italy",
        "duration": 3,
        "budgetLevel": "Luxury",
        "bestSeason": "Autumn",
        "itinerary": []
    });
    let err = validate_against_schema(ItineraryRecord::schema(), &payload).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("/duration"));
}
