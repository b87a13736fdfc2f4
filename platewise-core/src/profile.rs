//! The user's nutrition profile.
//!
//! A profile is created with defaults at session start and edited one field
//! at a time. Writes never validate across fields: numeric fields coerce their
//! text to a number and let `NaN` through, leaving it to the prompt builder to
//! reject unusable input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the user wants to do with their weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Lose weight.
    Lose,
    /// Keep the current weight.
    #[default]
    Maintain,
    /// Gain weight.
    Gain,
}

impl Goal {
    /// All goals, in the order a form would list them.
    #[must_use]
    pub fn all() -> &'static [Goal] {
        &[Self::Lose, Self::Maintain, Self::Gain]
    }

    /// Wire/form key for this goal.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lose => "lose",
            Self::Maintain => "maintain",
            Self::Gain => "gain",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "lose" => Ok(Self::Lose),
            "maintain" => Ok(Self::Maintain),
            "gain" => Ok(Self::Gain),
            other => Err(format!("unknown goal: '{other}'")),
        }
    }
}

/// An editable field of [`UserProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    /// Comma-separated foods the user likes.
    PreferredFoods,
    /// Free-text allergy list.
    Allergies,
    /// Body weight in kilograms.
    Weight,
    /// Height in centimeters.
    Height,
    /// Weight goal.
    Goal,
}

impl FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preferredFoods" | "preferred_foods" => Ok(Self::PreferredFoods),
            "allergies" => Ok(Self::Allergies),
            "weight" => Ok(Self::Weight),
            "height" => Ok(Self::Height),
            "goal" => Ok(Self::Goal),
            other => Err(format!("unknown profile field: '{other}'")),
        }
    }
}

/// The user's nutrition profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Foods the user prefers. Required for generation.
    pub preferred_foods: String,
    /// Allergies; empty means none.
    pub allergies: String,
    /// Weight in kilograms. May be `NaN` after a non-numeric edit.
    pub weight: f64,
    /// Height in centimeters, if given.
    pub height: Option<f64>,
    /// Weight goal.
    pub goal: Goal,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            preferred_foods: String::new(),
            allergies: String::new(),
            weight: 0.0,
            height: None,
            goal: Goal::Maintain,
        }
    }
}

impl UserProfile {
    /// Return a copy of this profile with one field replaced.
    #[must_use]
    pub fn update(&self, field: ProfileField, value: &str) -> Self {
        let mut next = self.clone();
        next.set(field, value);
        next
    }

    /// Replace one field in place.
    ///
    /// Numeric fields coerce: blank text becomes zero (or no height), anything
    /// unparseable becomes `NaN`. An unrecognised goal falls back to
    /// [`Goal::Maintain`].
    pub fn set(&mut self, field: ProfileField, value: &str) {
        match field {
            ProfileField::PreferredFoods => self.preferred_foods = value.to_string(),
            ProfileField::Allergies => self.allergies = value.to_string(),
            ProfileField::Weight => self.weight = coerce_number(value),
            ProfileField::Height => {
                self.height = if value.trim().is_empty() {
                    None
                } else {
                    Some(coerce_number(value))
                };
            }
            ProfileField::Goal => {
                self.goal = value.parse().unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "Falling back to maintain goal");
                    Goal::Maintain
                });
            }
        }
    }

    /// Whether the weight can be used for generation.
    #[must_use]
    pub fn has_usable_weight(&self) -> bool {
        self.weight > 0.0
    }

    /// Height, if present and non-zero.
    #[must_use]
    pub fn usable_height(&self) -> Option<f64> {
        self.height.filter(|h| *h != 0.0 && !h.is_nan())
    }

    /// Body-mass index rounded to one decimal, computed only when a height is present.
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        let meters = self.usable_height()? / 100.0;
        let raw = self.weight / (meters * meters);
        Some((raw * 10.0).round() / 10.0)
    }

    /// BMI formatted with exactly one decimal (e.g. `"22.9"`).
    #[must_use]
    pub fn bmi_display(&self) -> Option<String> {
        self.bmi().map(|b| format!("{b:.1}"))
    }
}

/// Coerce form text to a number the way a numeric input does.
fn coerce_number(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
