//! Inference error types.
//!
//! Every variant belongs to the same failure category as far as callers are
//! concerned: the call did not produce usable text.

use thiserror::Error;

/// Errors that can occur while calling the inference service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request could not be sent or the connection failed.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status.
    #[error("LLM service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response body lacks `candidates[0].content.parts[0].text`.
    #[error("LLM response is malformed: {0}")]
    MalformedResponse(String),

    /// Request timed out.
    #[error("LLM request timed out after {0}ms")]
    Timeout(u64),

    /// No backend is configured.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    /// Configuration error (e.g. missing API key).
    #[error("LLM configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Classify a transport error, reporting timeouts with the configured limit.
    ///
    /// The request URL is dropped from the message: it carries the API key.
    #[must_use]
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_ms)
        } else {
            LlmError::RequestFailed(err.without_url().to_string())
        }
    }

    /// Like [`from_transport`](Self::from_transport), for a body that could not
    /// be read or decoded.
    #[must_use]
    pub fn from_body(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_ms)
        } else {
            LlmError::MalformedResponse(err.without_url().to_string())
        }
    }

    /// Whether this error came back from the network rather than local setup.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_) | Self::Status { .. } | Self::MalformedResponse(_) | Self::Timeout(_)
        )
    }
}
