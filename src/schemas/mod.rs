//! JSON Schema plumbing for structured upstream output.

mod schema;
pub mod validation;
pub mod validator;

pub use schema::{apply_doc_comments, CompletionSchema, SchemaHandle};
pub use validator::{parse_itinerary, parse_structured, UnstructuredText};
