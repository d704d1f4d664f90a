use crate::{
    core::{
        client::{AttemptOutcome, ModelClient},
        config::PlannerConfig,
        mock::generate_mock_itinerary,
    },
    error::{PlannerError, Result},
    schemas::parse_itinerary,
    services::{cleanup::strip_code_fences, prompts::ITINERARY_INSTRUCTION, GeminiClient},
    types::{ResponseEnvelope, TravelRequest},
};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info, warn};

pub const NO_CREDENTIAL_REASON: &str = "No API key configured";
pub const MOCK_ONLY_REASON: &str = "Mock-only mode";
pub const UPSTREAM_UNAVAILABLE_REASON: &str = "Upstream models unavailable";
pub const UPSTREAM_MISCONFIGURED_REASON: &str = "Upstream credential rejected";
pub const INTERNAL_FAULT_MESSAGE: &str = "Failed to generate itinerary";

/// Turns travel requests into itineraries.
///
/// Candidate models are tried one at a time in configured order and the
/// first success wins. When there is no client, every candidate fails, or a
/// candidate reports a fatal misconfiguration, the answer comes from the
/// mock generator instead. Only invalid input or an internal fault yields
/// `success == false`.
pub struct Planner {
    config: PlannerConfig,
    client: Option<Arc<dyn ModelClient>>,
}

enum CandidateRun {
    Answered { model: String, text: String },
    Exhausted,
    Aborted,
}

impl Planner {
    /// Build a planner backed by Gemini when the config carries a credential,
    /// or a mock-only planner when it does not.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let client = match config.api_key() {
            Some(_) => {
                let gemini: Arc<dyn ModelClient> = Arc::new(GeminiClient::from_config(&config)?);
                Some(gemini)
            }
            None => None,
        };

        Ok(Self {
            config,
            client,
        })
    }

    /// Use a specific model client regardless of the configured credential.
    pub fn with_client(config: PlannerConfig, client: Arc<dyn ModelClient>) -> Self {
        Self {
            config,
            client: Some(client),
        }
    }

    pub fn mock_only(config: PlannerConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.client.is_some()
    }

    pub async fn generate(&self, prompt: &str) -> ResponseEnvelope {
        let started = Instant::now();
        debug!(target: "tripplanner::orchestrator", prompt, "received request");

        let request = match TravelRequest::new(prompt) {
            Ok(request) => request,
            Err(err) => {
                warn!(target: "tripplanner::orchestrator", error = %err, "rejected request");
                let message = match err {
                    PlannerError::InvalidInput(message) => message,
                    other => other.to_string(),
                };
                return ResponseEnvelope::failure(message, started.elapsed());
            }
        };

        match self.run(&request, started).await {
            Ok(envelope) => envelope,
            Err(err) => {
                error!(
                    target: "tripplanner::orchestrator",
                    code = err.error_code(),
                    error = %err,
                    "itinerary generation failed"
                );
                ResponseEnvelope::failure(INTERNAL_FAULT_MESSAGE, started.elapsed())
            }
        }
    }

    async fn run(&self, request: &TravelRequest, started: Instant) -> Result<ResponseEnvelope> {
        let fallback_reason = match &self.client {
            None if self.config.has_api_key() => {
                info!(target: "tripplanner::orchestrator", "mock-only mode, using mock itinerary");
                MOCK_ONLY_REASON
            }
            None => {
                info!(target: "tripplanner::orchestrator", "no upstream credential configured, using mock itinerary");
                NO_CREDENTIAL_REASON
            }
            Some(client) => match self.run_candidates(client.as_ref(), request).await {
                CandidateRun::Answered { model, text } => {
                    let elapsed = started.elapsed();
                    info!(
                        target: "tripplanner::orchestrator",
                        model = %model,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "live itinerary generated"
                    );
                    return Ok(ResponseEnvelope::live(
                        text,
                        model,
                        elapsed,
                        request.prompt_length(),
                    ));
                }
                CandidateRun::Exhausted => {
                    warn!(target: "tripplanner::orchestrator", "all upstream models failed, using mock itinerary");
                    UPSTREAM_UNAVAILABLE_REASON
                }
                CandidateRun::Aborted => UPSTREAM_MISCONFIGURED_REASON,
            },
        };

        self.mock_response(request, fallback_reason, started).await
    }

    async fn run_candidates(&self, client: &dyn ModelClient, request: &TravelRequest) -> CandidateRun {
        let attempt_timeout = self.config.attempt_timeout();
        let total = self.config.models().len();

        for (index, model) in self.config.models().iter().enumerate() {
            info!(
                target: "tripplanner::orchestrator",
                model = %model,
                attempt = index + 1,
                of = total,
                "trying upstream model"
            );

            let call = client.attempt(model, ITINERARY_INSTRUCTION, request.prompt_text(), attempt_timeout);
            let outcome = timeout(attempt_timeout, call)
                .await
                .unwrap_or_else(|_| AttemptOutcome::timeout());

            match outcome {
                AttemptOutcome::Success(raw) => {
                    let text = strip_code_fences(&raw);
                    if text.is_empty() {
                        warn!(target: "tripplanner::orchestrator", model = %model, "model returned only code fences");
                        continue;
                    }
                    if let Err(unstructured) = parse_itinerary(&text) {
                        warn!(
                            target: "tripplanner::orchestrator",
                            model = %model,
                            reason = %unstructured.reason,
                            "model answered with unstructured text"
                        );
                    }
                    return CandidateRun::Answered {
                        model: model.clone(),
                        text,
                    };
                }
                failure @ AttemptOutcome::RecoverableFailure { .. } => {
                    warn!(
                        target: "tripplanner::orchestrator",
                        model = %model,
                        outcome = %failure,
                        "upstream model failed, trying next candidate"
                    );
                }
                AttemptOutcome::FatalFailure(message) => {
                    error!(
                        target: "tripplanner::orchestrator",
                        model = %model,
                        error = %message,
                        skipped = total - index - 1,
                        "upstream configuration rejected, abandoning remaining candidates"
                    );
                    return CandidateRun::Aborted;
                }
            }
        }

        CandidateRun::Exhausted
    }

    async fn mock_response(
        &self,
        request: &TravelRequest,
        fallback_reason: &str,
        started: Instant,
    ) -> Result<ResponseEnvelope> {
        let record = generate_mock_itinerary(request.original_text());
        let text = serde_json::to_string_pretty(&record).map_err(|err| {
            PlannerError::Internal(format!("failed to serialize mock itinerary: {err}"))
        })?;

        sleep(self.config.mock_delay()).await;

        let elapsed = started.elapsed();
        info!(
            target: "tripplanner::orchestrator",
            destination = %record.destination,
            reason = fallback_reason,
            elapsed_ms = elapsed.as_millis() as u64,
            "mock itinerary generated"
        );
        Ok(ResponseEnvelope::mock(
            text,
            fallback_reason,
            elapsed,
            request.prompt_length(),
        ))
    }

    /// Snapshot of how this planner will answer requests.
    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            api_key_configured: self.config.has_api_key(),
            available_models: self.config.models().to_vec(),
            note: if self.is_live() {
                "Using Gemini API with mock fallback"
            } else {
                "Using mock data only"
            },
        }
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub api_key_configured: bool,
    pub available_models: Vec<String>,
    pub note: &'static str,
}
