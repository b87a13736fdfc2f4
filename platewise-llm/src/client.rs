//! LLM client: the `generateContent` backend and the [`Inference`] seam the
//! workflows are written against.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{GenerateContentRequest, GenerateContentResponse, LlmRequest, LlmResponse};

/// Longest slice of an error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Anything that can turn a prompt (plus optional image) into raw text.
///
/// A single non-streaming call; no retries.
pub trait Inference: Send + Sync {
    /// Send one request and return the service's raw text.
    fn generate(
        &self,
        request: &LlmRequest,
    ) -> impl Future<Output = Result<LlmResponse, LlmError>> + Send;
}

/// Provider backend for inference.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// A Gemini-style `generateContent` endpoint; the key travels as the
    /// `key` query parameter.
    Gemini {
        /// API base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
        base_url: String,
        /// API key.
        api_key: String,
    },
    /// No backend; every call fails with [`LlmError::Unavailable`].
    None,
}

/// Tunables shared by every request a client sends.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Model name used in the endpoint path.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Optional response MIME type hint.
    pub response_mime_type: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            timeout: Duration::from_secs(30),
            response_mime_type: None,
        }
    }
}

/// HTTP client for the inference service.
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    settings: ClientSettings,
}

impl LlmClient {
    /// Create a new client.
    #[must_use]
    pub fn new(provider: LlmProvider, settings: ClientSettings) -> Self {
        Self {
            provider,
            http: Client::new(),
            settings,
        }
    }

    /// Create a Gemini client whose API key comes from an environment variable.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if the variable is unset or empty.
    pub fn gemini_from_env(
        base_url: impl Into<String>,
        api_key_env: &str,
        settings: ClientSettings,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::ConfigError(format!("{api_key_env} is not set")))?;

        Ok(Self::new(
            LlmProvider::Gemini {
                base_url: base_url.into(),
                api_key,
            },
            settings,
        ))
    }

    /// Create a client with no backend (all calls fail).
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, ClientSettings::default())
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Model requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Send using the `generateContent` API.
    async fn generate_gemini(
        &self,
        base_url: &str,
        api_key: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            self.settings.model
        );
        let body = GenerateContentRequest::from_request(
            request,
            self.settings.response_mime_type.as_deref(),
        );
        let timeout_ms = u64::try_from(self.settings.timeout.as_millis()).unwrap_or(u64::MAX);

        debug!(
            model = %self.settings.model,
            prompt_len = request.prompt.len(),
            has_image = request.image.is_some(),
            "Sending generateContent request"
        );

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .timeout(self.settings.timeout)
            .send()
            .await
            .map_err(|e| {
                let err = LlmError::from_transport(e, timeout_ms);
                warn!(error = %err, "Inference request failed");
                err
            })?;

        let status = resp.status();
        if !status.is_success() {
            let mut text = resp.text().await.unwrap_or_default();
            truncate_at_char_boundary(&mut text, MAX_ERROR_BODY);
            warn!(status = status.as_u16(), "Inference service returned an error status");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateContentResponse = resp.json().await.map_err(|e| {
            let err = LlmError::from_body(e, timeout_ms);
            warn!(error = %err, "Failed to read inference response");
            err
        })?;

        let text = parsed.into_first_text().ok_or_else(|| {
            warn!("Inference response has no candidate text");
            LlmError::MalformedResponse("missing candidates[0].content.parts[0].text".into())
        })?;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(latency_ms, text_len = text.len(), "Inference response received");

        Ok(LlmResponse {
            text,
            latency_ms,
            model: self.settings.model.clone(),
        })
    }
}

impl Inference for LlmClient {
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("No LLM provider configured".into())),
            LlmProvider::Gemini { base_url, api_key } => {
                self.generate_gemini(base_url, api_key, request).await
            }
        }
    }
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}
