use crate::error::{PlannerError, Result};

/// Shortest prompt, in characters after trimming, worth sending anywhere.
pub const MIN_PROMPT_CHARS: usize = 3;

/// A validated free-text travel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelRequest {
    original: String,
    prompt_text: String,
}

impl TravelRequest {
    /// Trim `prompt` and reject it if fewer than three characters remain.
    pub fn new(prompt: &str) -> Result<Self> {
        let trimmed = prompt.trim();
        if trimmed.chars().count() < MIN_PROMPT_CHARS {
            return Err(PlannerError::InvalidInput("prompt too short".to_string()));
        }
        Ok(Self {
            original: prompt.to_string(),
            prompt_text: trimmed.to_string(),
        })
    }

    /// The trimmed text sent upstream.
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// The prompt exactly as the caller supplied it.
    pub fn original_text(&self) -> &str {
        &self.original
    }

    /// Length in characters, as reported in response metadata.
    pub fn prompt_length(&self) -> usize {
        self.prompt_text.chars().count()
    }
}
