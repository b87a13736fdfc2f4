//! Error types for the orchestration layer.

use platewise_core::{CoreError, ParseFailure, ValidationFailure};
use platewise_llm::LlmError;
use thiserror::Error;

/// Why a workflow run did not produce a result.
///
/// Workflows collapse all of these into one user-facing notice; the variant
/// is kept for logs and tests.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Required input missing; no call was made.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Transport, status or structural failure from the service.
    #[error(transparent)]
    Inference(#[from] LlmError),

    /// The reply text did not match the schema.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Errors raised while assembling a session.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration or prompt catalog could not be loaded.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The inference client could not be built.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Logging could not be initialised.
    #[error("failed to initialise logging: {0}")]
    Telemetry(String),
}
