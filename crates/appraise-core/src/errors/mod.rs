//! Error types for the evaluation pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A check with the same name is already registered.
    #[error("check already registered: {name}")]
    DuplicateCheck { name: String },

    /// No check registered under this name.
    #[error("check not found: {name}")]
    CheckNotFound { name: String },

    /// No criteria document stored for this check.
    #[error("criteria document not found for check: {name}")]
    CriteriaNotFound { name: String },
}

/// Errors raised by the text-generation collaborator.
///
/// Each condition must stay distinguishable by the caller: the executor treats
/// total collaborator unavailability as the one failure that surfaces out of a
/// run instead of being downgraded to a default verdict.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Connection-level failure (DNS, TLS, refused, non-2xx response).
    #[error("{provider} connection error: {message}")]
    Connection { provider: String, message: String },

    /// The call exceeded its configured timeout.
    #[error("{provider} request timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    /// Rate limit exceeded (HTTP 429).
    #[error("{provider} rate limit exceeded (retry after {retry_after:?})")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },
}

impl LlmError {
    /// Whether a later retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::RateLimited { .. })
    }
}

/// Judge errors.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    /// The text-generation collaborator failed; no safe default verdict can
    /// be inferred, so this aborts the step evaluation.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The evaluation produced a malformed or unusable verdict. Recovered by
    /// the executor into a fail-open verdict.
    #[error("evaluation failed for check '{check}': {message}")]
    Evaluation { check: String, message: String },
}

/// Errors that escape the executor boundary.
///
/// Check failures and recoverable judge failures are folded into the run
/// result instead; only these two conditions are hard failures.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// A step named a check the registry does not know. Planning skips unknown
    /// names silently; reaching execution with one is a contract violation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The judge's text-generation collaborator was unavailable.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_retryability() {
        let timeout = LlmError::Timeout {
            provider: "openai".into(),
            timeout: Duration::from_secs(30),
        };
        assert!(timeout.is_retryable());

        let conn = LlmError::Connection {
            provider: "openai".into(),
            message: "refused".into(),
        };
        assert!(!conn.is_retryable());
    }

    #[test]
    fn registry_errors_render_check_name() {
        let err = RegistryError::CriteriaNotFound {
            name: "length_check".into(),
        };
        assert!(err.to_string().contains("length_check"));
    }
}
