use crate::error::{PlannerError, Result};
use serde::Serialize;
use std::{env, fmt, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(800);

/// Candidate models in priority order.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-001",
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-2.0-flash-lite",
    "gemini-2.5-flash-lite",
];

/// Sampling settings sent as `generationConfig` with every attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2000,
        }
    }
}

/// Everything the planner needs to know about its environment.
///
/// A missing API key is a supported mode: every request is answered from the
/// mock generator.
#[derive(Clone)]
pub struct PlannerConfig {
    models: Vec<String>,
    api_key: Option<String>,
    base_url: String,
    attempt_timeout: Duration,
    mock_delay: Duration,
    generation: GenerationSettings,
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|model| model.to_string()).collect(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            mock_delay: DEFAULT_MOCK_DELAY,
            generation: GenerationSettings::default(),
        }
    }

    /// Blank keys count as absent.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn mock_delay(&self) -> Duration {
        self.mock_delay
    }

    pub fn generation(&self) -> &GenerationSettings {
        &self.generation
    }

    /// Read `GEMINI_API_KEY`, `GEMINI_BASE_URL`, `PLANNER_MODELS`,
    /// `PLANNER_TIMEOUT_MS` and `PLANNER_MOCK_DELAY_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new().with_api_key(lookup("GEMINI_API_KEY"));

        if let Some(base_url) = lookup("GEMINI_BASE_URL").filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(models) = lookup("PLANNER_MODELS") {
            let models: Vec<String> = models
                .split(',')
                .map(str::trim)
                .filter(|model| !model.is_empty())
                .map(str::to_string)
                .collect();
            if models.is_empty() {
                return Err(PlannerError::Config(
                    "PLANNER_MODELS must name at least one model".to_string(),
                ));
            }
            config = config.with_models(models);
        }

        if let Some(timeout) = parse_millis(&lookup, "PLANNER_TIMEOUT_MS")? {
            config = config.with_attempt_timeout(timeout);
        }

        if let Some(delay) = parse_millis(&lookup, "PLANNER_MOCK_DELAY_MS")? {
            config = config.with_mock_delay(delay);
        }

        Ok(config)
    }
}

fn parse_millis<F>(lookup: &F, name: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|millis| Some(Duration::from_millis(millis)))
        .map_err(|err| PlannerError::Config(format!("{name} must be milliseconds: {err}")))
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("models", &self.models)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("mock_delay", &self.mock_delay)
            .field("generation", &self.generation)
            .finish()
    }
}
