//! trip-planner-rs: travel itineraries from free text, with ordered model fallback
//!
//! A [`Planner`] sends the request to each configured Gemini model in turn and
//! returns the first answer. When no API key is configured, or every model
//! fails, a canned itinerary is returned instead, so a valid request always
//! produces `success == true`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_planner_rs::{Planner, PlannerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = Planner::new(PlannerConfig::from_env()?)?;
//!
//!     let envelope = planner.generate("4 days in Kyoto in autumn").await;
//!     println!("{}", serde_json::to_string_pretty(&envelope)?);
//!     Ok(())
//! }
//! ```

extern crate self as trip_planner_rs;

pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod types;

pub use crate::core::{
    generate_mock_itinerary, AttemptOutcome, GenerationSettings, HealthReport, ModelClient,
    Planner, PlannerConfig, DEFAULT_MODELS,
};
pub use error::{PlannerError, Result};
pub use planner_macros::completion_schema;
pub use schemas::{parse_itinerary, CompletionSchema, SchemaHandle, UnstructuredText};
pub use services::{strip_code_fences, GeminiClient, ModelInfo};
pub use types::{
    BudgetLevel, DayPlan, ItineraryRecord, Metadata, ResponseEnvelope, Source, TravelRequest,
};

#[cfg(feature = "cli")]
pub mod cli;
