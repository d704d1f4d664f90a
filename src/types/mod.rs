pub mod envelope;
pub mod itinerary;
pub mod request;

pub use envelope::{Metadata, ResponseEnvelope, Source};
pub use itinerary::{BudgetLevel, DayPlan, ItineraryRecord, NOT_APPLICABLE};
pub use request::{TravelRequest, MIN_PROMPT_CHARS};
