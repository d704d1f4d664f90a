use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    core::{
        client::{AttemptOutcome, ModelClient},
        config::{GenerationSettings, PlannerConfig, DEFAULT_BASE_URL},
    },
    error::{PlannerError, Result},
    services::prompts::build_itinerary_prompt,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// Client for the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    generation: GenerationSettings,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| PlannerError::Internal(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            generation: GenerationSettings::default(),
        })
    }

    /// Client for the credential, base URL and sampling settings in `config`.
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            PlannerError::Config("GEMINI_API_KEY must be set to reach the Gemini API".to_string())
        })?;

        Ok(Self::new(api_key)?
            .with_base_url(config.base_url())
            .with_generation(config.generation().clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every model the credential can see.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .http
            .get(build_models_url(&self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = upstream_error(&body)
                .map(|error| error.message)
                .unwrap_or(body);
            return Err(PlannerError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let listing: ModelListing = serde_json::from_str(&body)?;
        Ok(listing.models)
    }

    /// Models that accept `generateContent`, i.e. usable as candidates.
    pub async fn generate_content_models(&self) -> Result<Vec<ModelInfo>> {
        let mut models = self.list_models().await?;
        models.retain(ModelInfo::supports_generate_content);
        Ok(models)
    }

    async fn generate_content(&self, model_id: &str, body: &Value, timeout: Duration) -> AttemptOutcome {
        let response = match self
            .http
            .post(build_generate_url(&self.base_url, model_id))
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(timeout)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return classify_transport_error(&err),
        };

        let status = response.status();
        let response_text = match response.text().await {
            Ok(text) => text,
            Err(err) => return classify_transport_error(&err),
        };

        debug!(
            target: "tripplanner::upstream",
            model = model_id,
            status = status.as_u16(),
            bytes = response_text.len(),
            "generateContent responded"
        );

        if !status.is_success() {
            return classify_error_status(status, &response_text);
        }

        let response_json: Value = match serde_json::from_str(&response_text) {
            Ok(value) => value,
            Err(err) => {
                return AttemptOutcome::recoverable(
                    Some(status.as_u16()),
                    format!("malformed response body: {err}"),
                )
            }
        };

        match first_candidate_text(&response_json) {
            Some(text) if !text.trim().is_empty() => AttemptOutcome::Success(text.to_string()),
            _ => AttemptOutcome::recoverable(Some(status.as_u16()), "empty-response"),
        }
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn attempt(
        &self,
        model_id: &str,
        instruction: &str,
        user_text: &str,
        timeout: Duration,
    ) -> AttemptOutcome {
        let body = GenerateContentRequest::new(build_itinerary_prompt(instruction, user_text))
            .with_generation(self.generation.clone())
            .into_value();

        self.generate_content(model_id, &body, timeout).await
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("generation", &self.generation)
            .finish()
    }
}

/// Model entry from `GET /models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == GENERATE_CONTENT_METHOD)
    }
}

#[derive(Debug, Deserialize)]
struct ModelListing {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: UpstreamError,
}

fn upstream_error(body: &str) -> Option<UpstreamError> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error)
}

fn classify_transport_error(err: &reqwest::Error) -> AttemptOutcome {
    if err.is_timeout() {
        return AttemptOutcome::timeout();
    }
    if err.is_builder() {
        // The request could not even be built, e.g. a key that is not a valid header value.
        return AttemptOutcome::fatal(format!("invalid request configuration: {err}"));
    }
    warn!(target: "tripplanner::upstream", error = %err, "transport failure");
    AttemptOutcome::recoverable(err.status().map(|status| status.as_u16()), err.to_string())
}

fn classify_error_status(status: StatusCode, body: &str) -> AttemptOutcome {
    let error = upstream_error(body);
    let message = error
        .as_ref()
        .map(|error| error.message.clone())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            }
        });

    let credential_rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || (status == StatusCode::BAD_REQUEST
            && error.as_ref().is_some_and(names_invalid_api_key));

    if credential_rejected {
        AttemptOutcome::fatal(format!("credential rejected (HTTP {}): {}", status.as_u16(), message))
    } else {
        AttemptOutcome::recoverable(Some(status.as_u16()), message)
    }
}

fn names_invalid_api_key(error: &UpstreamError) -> bool {
    let reason_matches = error.details.iter().any(|detail| {
        detail.get("reason").and_then(Value::as_str) == Some("API_KEY_INVALID")
    });
    let message = error.message.to_lowercase();
    reason_matches
        || message.contains("api key not valid")
        || (error.status.as_deref() == Some("UNAUTHENTICATED"))
}

fn first_candidate_text(response: &Value) -> Option<&str> {
    response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

fn build_generate_url(base_url: &str, model_id: &str) -> String {
    let model_id = model_id.strip_prefix("models/").unwrap_or(model_id);
    format!(
        "{}/models/{}:{}",
        base_url.trim_end_matches('/'),
        model_id,
        GENERATE_CONTENT_METHOD
    )
}

fn build_models_url(base_url: &str) -> String {
    format!("{}/models", base_url.trim_end_matches('/'))
}

/// Body of a single-turn `generateContent` call.
#[derive(Clone, Debug)]
pub struct GenerateContentRequest {
    text: String,
    generation: Option<GenerationSettings>,
}

impl GenerateContentRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generation: None,
        }
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": self.text }]
                }
            ]
        });

        if let Some(config) = self
            .generation
            .and_then(|generation| serde_json::to_value(generation).ok())
        {
            body["generationConfig"] = config;
        }

        body
    }
}
