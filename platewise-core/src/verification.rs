//! Result of a post-meal plate check.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// What the service concluded about a plate photo.
///
/// Values pass through as received: `score` is not clamped and
/// `clean_plate` is not cross-checked against the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Whether no food is left.
    pub clean_plate: bool,
    /// Description of leftovers; only meaningful when `clean_plate` is false.
    #[serde(default)]
    pub food_remaining: String,
    /// Dishes that were used, in reply order.
    #[serde(default)]
    pub used_dishes: Vec<String>,
    /// Dishes that were set out but unused, in reply order.
    #[serde(default)]
    pub unused_dishes: Vec<String>,
    /// Score, nominally 0–100.
    pub score: f64,
    /// Feedback for the user.
    pub feedback: String,
}

impl VerificationResult {
    /// Headline for the verification view.
    #[must_use]
    pub fn headline(&self, locale: Locale) -> &'static str {
        match (self.clean_plate, locale) {
            (true, Locale::Ko) => "완식 인증 완료!",
            (false, Locale::Ko) => "잔반이 있습니다",
            (true, Locale::En) => "Clean plate confirmed!",
            (false, Locale::En) => "There is food left over",
        }
    }

    /// Leftover description, if there is one worth showing.
    #[must_use]
    pub fn leftovers(&self) -> Option<&str> {
        let trimmed = self.food_remaining.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
