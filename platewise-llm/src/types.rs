//! Core types for inference requests and responses, plus the
//! `generateContent` wire format.

use serde::{Deserialize, Serialize};

/// An image attached inline to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

/// A request to the inference service: prompt text and an optional image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmRequest {
    /// Prompt text.
    pub prompt: String,
    /// Inline image, for plate verification.
    pub image: Option<InlineImage>,
}

impl LlmRequest {
    /// A text-only request.
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }

    /// Attach an inline image.
    #[must_use]
    pub fn with_image(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.image = Some(InlineImage {
            mime_type: mime_type.into(),
            data: data.into(),
        });
        self
    }
}

/// A response from the inference service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// The generated text, untouched.
    pub text: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Which model was used.
    pub model: String,
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// `generateContent` request body.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationConfig {
    pub response_mime_type: String,
}

impl GenerateContentRequest {
    /// One content entry: the prompt, then the image if any.
    pub(crate) fn from_request(request: &LlmRequest, response_mime_type: Option<&str>) -> Self {
        let mut parts = vec![Part::Text {
            text: request.prompt.clone(),
        }];
        if let Some(image) = &request.image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            });
        }

        Self {
            contents: vec![Content { parts }],
            generation_config: response_mime_type.map(|m| GenerationConfig {
                response_mime_type: m.to_string(),
            }),
        }
    }
}

/// `generateContent` response body. Every level is optional so a missing
/// path is reported as a malformed response instead of a decode error.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    pub(crate) fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
