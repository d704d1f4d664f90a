use crate::{
    schemas::{parse_itinerary, UnstructuredText},
    types::ItineraryRecord,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which path produced an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Live,
    Mock,
}

/// Provenance attached to every successful envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub source: Source,
    /// Upstream model that answered; only set for live results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_identifier: Option<String>,
    pub elapsed_millis: u64,
    pub prompt_length: usize,
    /// Why the mock path was taken; only set for mock results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Uniform result of one generation request.
///
/// Serializes as either
/// `{"success": true, "itineraryRawText": ..., "metadata": {...}}` or
/// `{"success": false, "errorMessage": ..., "elapsedMillis": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary_raw_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_millis: Option<u64>,
}

impl ResponseEnvelope {
    pub fn live(
        itinerary_raw_text: String,
        model_identifier: impl Into<String>,
        elapsed: Duration,
        prompt_length: usize,
    ) -> Self {
        Self::succeeded(
            itinerary_raw_text,
            Metadata {
                source: Source::Live,
                model_identifier: Some(model_identifier.into()),
                elapsed_millis: millis(elapsed),
                prompt_length,
                fallback_reason: None,
            },
        )
    }

    pub fn mock(
        itinerary_raw_text: String,
        fallback_reason: impl Into<String>,
        elapsed: Duration,
        prompt_length: usize,
    ) -> Self {
        Self::succeeded(
            itinerary_raw_text,
            Metadata {
                source: Source::Mock,
                model_identifier: None,
                elapsed_millis: millis(elapsed),
                prompt_length,
                fallback_reason: Some(fallback_reason.into()),
            },
        )
    }

    pub fn failure(error_message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            itinerary_raw_text: None,
            metadata: None,
            error_message: Some(error_message.into()),
            elapsed_millis: Some(millis(elapsed)),
        }
    }

    fn succeeded(itinerary_raw_text: String, metadata: Metadata) -> Self {
        Self {
            success: true,
            itinerary_raw_text: Some(itinerary_raw_text),
            metadata: Some(metadata),
            error_message: None,
            elapsed_millis: None,
        }
    }

    pub fn source(&self) -> Option<Source> {
        self.metadata.as_ref().map(|meta| meta.source)
    }

    /// Elapsed time for either shape of envelope.
    pub fn elapsed_millis(&self) -> u64 {
        self.metadata
            .as_ref()
            .map(|meta| meta.elapsed_millis)
            .or(self.elapsed_millis)
            .unwrap_or_default()
    }

    /// Structured view of the itinerary text, if there is one.
    ///
    /// Returns `None` for failure envelopes.
    pub fn parse_itinerary(&self) -> Option<Result<ItineraryRecord, UnstructuredText>> {
        self.itinerary_raw_text.as_deref().map(parse_itinerary)
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
