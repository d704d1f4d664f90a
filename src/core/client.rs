use async_trait::async_trait;
use std::{fmt, time::Duration};

/// Result of one call against one upstream model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Raw model text, as returned.
    Success(String),
    /// This model failed; the next candidate may still work.
    RecoverableFailure {
        status_code: Option<u16>,
        message: String,
    },
    /// Misconfiguration that no other candidate will fix.
    FatalFailure(String),
}

impl AttemptOutcome {
    pub fn recoverable(status_code: Option<u16>, message: impl Into<String>) -> Self {
        AttemptOutcome::RecoverableFailure {
            status_code,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::recoverable(None, "timeout")
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        AttemptOutcome::FatalFailure(message.into())
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Success(text) => write!(f, "success ({} chars)", text.chars().count()),
            AttemptOutcome::RecoverableFailure {
                status_code: Some(status),
                message,
            } => write!(f, "recoverable failure (HTTP {status}): {message}"),
            AttemptOutcome::RecoverableFailure {
                status_code: None,
                message,
            } => write!(f, "recoverable failure: {message}"),
            AttemptOutcome::FatalFailure(message) => write!(f, "fatal failure: {message}"),
        }
    }
}

/// One upstream text-generation backend.
///
/// Implementations must not panic or return errors out of band: every
/// failure is folded into an [`AttemptOutcome`].
#[async_trait]
pub trait ModelClient: Send + Sync + fmt::Debug {
    async fn attempt(
        &self,
        model_id: &str,
        instruction: &str,
        user_text: &str,
        timeout: Duration,
    ) -> AttemptOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            AttemptOutcome::recoverable(Some(503), "overloaded").to_string(),
            "recoverable failure (HTTP 503): overloaded"
        );
        assert_eq!(
            AttemptOutcome::timeout().to_string(),
            "recoverable failure: timeout"
        );
        assert_eq!(
            AttemptOutcome::Success("abc".to_string()).to_string(),
            "success (3 chars)"
        );
    }
}
