pub mod cleanup;
pub mod gemini_client;
pub mod prompts;

pub use cleanup::strip_code_fences;
pub use gemini_client::{GeminiClient, GenerateContentRequest, ModelInfo};
pub use prompts::{build_itinerary_prompt, ITINERARY_INSTRUCTION};
