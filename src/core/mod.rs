pub mod client;
pub mod config;
pub mod mock;
pub mod planner;

pub use client::{AttemptOutcome, ModelClient};
pub use config::{GenerationSettings, PlannerConfig, DEFAULT_MODELS};
pub use mock::generate_mock_itinerary;
pub use planner::{HealthReport, Planner};
