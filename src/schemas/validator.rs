use crate::{
    error::{PlannerError, Result},
    schemas::{validation::validate_against_schema, CompletionSchema},
    types::ItineraryRecord,
};
use serde_json::Value;
use std::{collections::HashSet, fmt};

/// Text that could not be decoded into the expected record.
///
/// The original text is kept verbatim so a display layer can still show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstructuredText {
    pub text: String,
    pub reason: String,
}

impl UnstructuredText {
    fn new(text: &str, reason: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for UnstructuredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unstructured text: {}", self.reason)
    }
}

impl std::error::Error for UnstructuredText {}

/// Decode `raw` as `T`: JSON syntax, then the JSON Schema, then a typed decode.
pub fn parse_structured<T: CompletionSchema>(raw: &str) -> std::result::Result<T, UnstructuredText> {
    decode::<T>(raw).map_err(|err| UnstructuredText::new(raw, err.to_string()))
}

/// Decode an itinerary and check the record-level invariants the schema
/// cannot express.
pub fn parse_itinerary(raw: &str) -> std::result::Result<ItineraryRecord, UnstructuredText> {
    let record = parse_structured::<ItineraryRecord>(raw)?;
    check_day_order(&record).map_err(|err| UnstructuredText::new(raw, err.to_string()))?;
    Ok(record)
}

fn decode<T: CompletionSchema>(raw: &str) -> Result<T> {
    let schema = T::schema();
    let value: Value = serde_json::from_str(raw)?;
    validate_against_schema(schema, &value)?;

    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err.inner()
        ))
    })
}

fn check_day_order(record: &ItineraryRecord) -> Result<()> {
    let mut seen = HashSet::new();
    let mut previous = 0;

    for plan in &record.day_plans {
        if plan.day == 0 {
            return Err(PlannerError::Validation(
                "day numbers must be positive".to_string(),
            ));
        }
        if !seen.insert(plan.day) {
            return Err(PlannerError::Validation(format!(
                "day {} appears more than once",
                plan.day
            )));
        }
        if plan.day < previous {
            return Err(PlannerError::Validation(format!(
                "day {} listed after day {}",
                plan.day, previous
            )));
        }
        previous = plan.day;
    }

    Ok(())
}
