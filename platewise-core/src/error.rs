//! Error types for the platewise core library.

use thiserror::Error;

/// A required input was missing. Raised before any network call is made.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The profile has no preferred foods.
    #[error("preferred foods are required")]
    MissingPreferredFoods,

    /// The profile weight is zero or not a number.
    #[error("a positive weight is required")]
    MissingWeight,

    /// Verification was requested without an uploaded image.
    #[error("an image must be uploaded first")]
    MissingImage,
}

/// The inference reply could not be decoded into the expected schema.
///
/// Always carries the untouched reply so it can be shown for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("reply does not match the expected schema: {reason}")]
pub struct ParseFailure {
    /// The raw text exactly as the service returned it.
    pub raw: String,
    /// Decoder message describing what was wrong.
    pub reason: String,
}

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Required input missing.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// Reply text was not decodable.
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    /// Configuration or prompt catalog error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CoreError>;
