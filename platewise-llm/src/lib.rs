//! # platewise-llm: Inference Service Layer
//!
//! One call shape covers both workflows: prompt text, optionally followed by
//! an inline base64 image, sent to a `generateContent` endpoint. The reply's
//! `candidates[0].content.parts[0].text` comes back untouched; decoding it is
//! the caller's job.
//!
//! Transport failures, non-success statuses and structurally empty replies
//! are all reported as [`LlmError`]; callers treat them as one category.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientSettings, Inference, LlmClient, LlmProvider};
pub use error::LlmError;
pub use types::{InlineImage, LlmRequest, LlmResponse};
