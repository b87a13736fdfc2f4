//! Decoding the service's free-form reply into typed results.
//!
//! The reply is expected to be one JSON object, optionally wrapped in a
//! Markdown code fence. Decoding is strict: a reply either becomes a complete
//! domain value or a [`ParseFailure`] carrying the raw text. Only structure is
//! checked; numbers and flags pass through as received.

use serde::de::DeserializeOwned;

use crate::error::ParseFailure;
use crate::meal_plan::MealPlan;
use crate::verification::VerificationResult;

/// Remove a Markdown code fence surrounding the payload, then trim.
///
/// Handles an opening fence with or without a language tag (`` ```json ``)
/// and a closing fence. Text without fences is only trimmed.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(after_fence) = text.strip_prefix("```") {
        // Drop the info string (e.g. `json`) up to the end of the fence line.
        text = match after_fence.find('\n') {
            Some(newline) if is_info_string(&after_fence[..newline]) => &after_fence[newline + 1..],
            _ => strip_inline_tag(after_fence),
        };
    }

    if let Some(before_fence) = text.trim_end().strip_suffix("```") {
        text = before_fence;
    }

    text.trim()
}

/// Info strings are a single word like `json` or `JSON`.
fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Single-line fences: "```json {...}```".
fn strip_inline_tag(after_fence: &str) -> &str {
    let trimmed = after_fence.trim_start();
    let tag_len = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    &trimmed[tag_len..]
}

/// Decode a reply into any schema type.
///
/// # Errors
/// Returns [`ParseFailure`] if the reply is not valid JSON or is missing a
/// required key for `T`.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, ParseFailure> {
    let payload = strip_code_fences(raw);
    serde_json::from_str(payload).map_err(|e| {
        tracing::warn!(error = %e, raw_len = raw.len(), "Reply did not match the expected schema");
        ParseFailure {
            raw: raw.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Decode a meal-plan reply.
///
/// # Errors
/// Returns [`ParseFailure`] for non-JSON text or a missing meal slot, total
/// or tip.
pub fn parse_meal_plan(raw: &str) -> Result<MealPlan, ParseFailure> {
    parse_structured(raw)
}

/// Decode a plate verification reply.
///
/// # Errors
/// Returns [`ParseFailure`] for non-JSON text or when `cleanPlate`, `score`
/// or `feedback` is missing.
pub fn parse_verification(raw: &str) -> Result<VerificationResult, ParseFailure> {
    parse_structured(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEAL_JSON: &str = r#"{
  "breakfast": {"name": "Oatmeal", "calories": 350, "description": "oats and berries"},
  "lunch": {"name": "Chicken bowl", "calories": 600, "description": "chicken breast, rice"},
  "dinner": {"name": "Salmon salad", "calories": 500.5, "description": "greens"},
  "totalCalories": 1450.5,
  "tips": "Drink water"
}"#;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```\n{\"a\":1}\n```  \n"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json {\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn fenced_and_bare_replies_decode_identically() {
        let fenced = format!("```json\n{MEAL_JSON}\n```");
        let bare = parse_meal_plan(MEAL_JSON).expect("bare");
        let wrapped = parse_meal_plan(&fenced).expect("fenced");
        assert_eq!(bare, wrapped);
        assert_eq!(bare.lunch.name, "Chicken bowl");
        assert!((bare.total_calories - 1450.5).abs() < f64::EPSILON);
    }

    #[test]
    fn non_json_is_a_parse_failure_with_raw_text() {
        let raw = "Sorry, I can't help with that.";
        let err = parse_meal_plan(raw).expect_err("not json");
        assert_eq!(err.raw, raw);
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn missing_total_calories_is_a_parse_failure() {
        let raw = MEAL_JSON.replace("\"totalCalories\": 1450.5,", "");
        let err = parse_meal_plan(&raw).expect_err("missing key");
        assert!(err.reason.contains("totalCalories"));
    }

    #[test]
    fn missing_meal_slot_is_a_parse_failure() {
        let raw = r#"{"breakfast": {"name": "a", "calories": 1, "description": "b"},
                      "totalCalories": 1, "tips": ""}"#;
        assert!(parse_meal_plan(raw).is_err());
    }

    #[test]
    fn verification_optional_fields_default() {
        let r = parse_verification(r#"{"cleanPlate": true, "score": 95, "feedback": "nice"}"#)
            .expect("minimal reply");
        assert!(r.clean_plate);
        assert!(r.used_dishes.is_empty());
        assert!(r.food_remaining.is_empty());
    }

    #[test]
    fn verification_score_passes_through_unclamped() {
        let r = parse_verification(
            r#"```json
{"cleanPlate": false, "foodRemaining": "rice", "usedDishes": ["bowl", "spoon"],
 "unusedDishes": [], "score": 140, "feedback": "eat more"}
```"#,
        )
        .expect("fenced reply");
        assert!((r.score - 140.0).abs() < f64::EPSILON);
        assert_eq!(r.used_dishes, ["bowl", "spoon"]);
    }

    #[test]
    fn verification_missing_score_fails() {
        assert!(parse_verification(r#"{"cleanPlate": true, "feedback": "x"}"#).is_err());
    }

    #[test]
    fn wrong_type_fails_rather_than_coercing() {
        assert!(parse_verification(r#"{"cleanPlate": "yes", "score": 1, "feedback": "x"}"#).is_err());
    }
}
