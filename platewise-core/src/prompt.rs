//! Prompt templates and the builder that renders them.
//!
//! Both prompts demand a bare JSON reply in a fixed schema. The parser relies
//! on the service honouring that, but never trusts it blindly.
//!
//! Built-in catalogs exist for every [`Locale`]; a versioned TOML file can
//! replace them at startup.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationFailure};
use crate::locale::Locale;
use crate::profile::{Goal, UserProfile};

/// Meal-plan prompt (Korean).
pub const MEAL_PLAN_KO: &str = r#"다음 정보를 바탕으로 하루 식단을 추천해주세요:
- 선호 음식: {preferred_foods}
- 알레르기: {allergies}
- 체중: {weight}kg
{height_line}- 목표: {goal}

아침, 점심, 저녁 식단을 각각 추천하고, 각 식사의 예상 칼로리와 영양소 정보를 포함해주세요.
다른 설명 없이 아래 형식의 JSON 객체 하나로만 응답해주세요:
{
  "breakfast": {"name": "식사명", "calories": 칼로리, "description": "설명"},
  "lunch": {"name": "식사명", "calories": 칼로리, "description": "설명"},
  "dinner": {"name": "식사명", "calories": 칼로리, "description": "설명"},
  "totalCalories": 총칼로리,
  "tips": "건강 팁"
}"#;

/// Height/BMI line (Korean). Omitted entirely when there is no height.
pub const HEIGHT_LINE_KO: &str = "- 신장: {height}cm (BMI: {bmi})\n";

/// Plate verification prompt (Korean).
pub const VERIFICATION_KO: &str = r#"이 이미지를 분석하여 다음을 판단해주세요:
1. 잔반 여부 (음식이 남았는지)
2. 사용된 식기 종류와 개수
3. 미사용 식기가 있는지

다른 설명 없이 아래 형식의 JSON 객체 하나로만 응답해주세요:
{
  "cleanPlate": true/false,
  "foodRemaining": "남은 음식 설명",
  "usedDishes": ["사용된 식기 목록"],
  "unusedDishes": ["미사용 식기 목록"],
  "score": 0-100,
  "feedback": "피드백 메시지"
}"#;

/// Meal-plan prompt (English).
pub const MEAL_PLAN_EN: &str = r#"Recommend a one-day meal plan based on the following information:
- Preferred foods: {preferred_foods}
- Allergies: {allergies}
- Weight: {weight}kg
{height_line}- Goal: {goal}

Recommend breakfast, lunch and dinner, including the estimated calories and nutrition notes for each meal.
Respond with a single JSON object in exactly this format and nothing else:
{
  "breakfast": {"name": "meal name", "calories": calories, "description": "description"},
  "lunch": {"name": "meal name", "calories": calories, "description": "description"},
  "dinner": {"name": "meal name", "calories": calories, "description": "description"},
  "totalCalories": total calories,
  "tips": "health tip"
}"#;

/// Height/BMI line (English).
pub const HEIGHT_LINE_EN: &str = "- Height: {height}cm (BMI: {bmi})\n";

/// Plate verification prompt (English).
pub const VERIFICATION_EN: &str = r#"Analyse this image and determine:
1. Whether any food is left on the plate
2. Which kinds of dishes were used, and how many
3. Whether any dishes were left unused

Respond with a single JSON object in exactly this format and nothing else:
{
  "cleanPlate": true/false,
  "foodRemaining": "description of leftover food",
  "usedDishes": ["dishes that were used"],
  "unusedDishes": ["dishes that were not used"],
  "score": 0-100,
  "feedback": "feedback message"
}"#;

/// Fill `{key}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so user text containing braces
/// cannot pull in other variables. Unknown placeholders are left as-is.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let lookup: HashMap<&str, &str> = vars.iter().copied().collect();
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let key_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let key = &after[..key_len];

        match (key_len > 0, after[key_len..].starts_with('}'), lookup.get(key)) {
            (true, true, Some(value)) => {
                out.push_str(value);
                rest = &after[key_len + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Localized phrase for each goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalPhrases {
    /// Phrase for [`Goal::Lose`].
    pub lose: String,
    /// Phrase for [`Goal::Maintain`].
    pub maintain: String,
    /// Phrase for [`Goal::Gain`].
    pub gain: String,
}

impl GoalPhrases {
    /// Phrase for a goal.
    #[must_use]
    pub fn phrase(&self, goal: Goal) -> &str {
        match goal {
            Goal::Lose => &self.lose,
            Goal::Maintain => &self.maintain,
            Goal::Gain => &self.gain,
        }
    }
}

/// A complete set of prompt templates for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCatalog {
    /// Catalog version string (e.g. "1.0", or "builtin").
    pub version: String,
    /// Locale the templates are written in.
    pub locale: Locale,
    /// Meal-plan template.
    pub meal_plan: String,
    /// Height/BMI line template, inserted at `{height_line}`.
    pub height_line: String,
    /// Verification template.
    pub verification: String,
    /// Placeholder used when the user lists no allergies.
    pub allergies_none: String,
    /// Goal phrases.
    pub goals: GoalPhrases,
}

/// Wrapper matching the `[prompt]` table of a catalog file.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    prompt: PromptCatalog,
}

impl PromptCatalog {
    /// The compiled-in catalog for a locale.
    #[must_use]
    pub fn builtin(locale: Locale) -> Self {
        match locale {
            Locale::Ko => Self {
                version: "builtin".into(),
                locale,
                meal_plan: MEAL_PLAN_KO.into(),
                height_line: HEIGHT_LINE_KO.into(),
                verification: VERIFICATION_KO.into(),
                allergies_none: "없음".into(),
                goals: GoalPhrases {
                    lose: "체중 감량".into(),
                    maintain: "체중 유지".into(),
                    gain: "체중 증가".into(),
                },
            },
            Locale::En => Self {
                version: "builtin".into(),
                locale,
                meal_plan: MEAL_PLAN_EN.into(),
                height_line: HEIGHT_LINE_EN.into(),
                verification: VERIFICATION_EN.into(),
                allergies_none: "none".into(),
                goals: GoalPhrases {
                    lose: "lose weight".into(),
                    maintain: "maintain weight".into(),
                    gain: "gain weight".into(),
                },
            },
        }
    }

    /// Parse a catalog from TOML (a single `[prompt]` table).
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the TOML is invalid or the meal-plan
    /// template lacks a required placeholder.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        let file: TomlCatalogFile =
            toml::from_str(toml_str).map_err(|e| CoreError::Config(e.to_string()))?;
        let catalog = file.prompt;

        for required in ["{preferred_foods}", "{weight}", "{goal}"] {
            if !catalog.meal_plan.contains(required) {
                return Err(CoreError::Config(format!(
                    "meal_plan template is missing {required}"
                )));
            }
        }
        Ok(catalog)
    }

    /// Load a catalog from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::builtin(Locale::default())
    }
}

/// Renders profile and image requests into prompt text.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    catalog: PromptCatalog,
}

impl PromptBuilder {
    /// Builder over a specific catalog.
    #[must_use]
    pub fn new(catalog: PromptCatalog) -> Self {
        Self { catalog }
    }

    /// Builder over the built-in catalog for a locale.
    #[must_use]
    pub fn builtin(locale: Locale) -> Self {
        Self::new(PromptCatalog::builtin(locale))
    }

    /// The catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    /// Render the meal-plan prompt.
    ///
    /// This is the only required-field gate of the generation workflow.
    ///
    /// # Errors
    /// Returns a [`ValidationFailure`] if preferred foods are blank or the
    /// weight is not a positive number. No partial prompt is produced.
    ///
    /// Preferred foods made only of whitespace count as blank, so a stray
    /// space cannot send a prompt with an empty food list.
    pub fn meal_plan(&self, profile: &UserProfile) -> Result<String, ValidationFailure> {
        if profile.preferred_foods.trim().is_empty() {
            return Err(ValidationFailure::MissingPreferredFoods);
        }
        if !profile.has_usable_weight() {
            return Err(ValidationFailure::MissingWeight);
        }

        let height_line = match (profile.usable_height(), profile.bmi_display()) {
            (Some(height), Some(bmi)) => render_template(
                &self.catalog.height_line,
                &[("height", &height.to_string()), ("bmi", &bmi)],
            ),
            _ => String::new(),
        };

        let allergies = if profile.allergies.trim().is_empty() {
            self.catalog.allergies_none.as_str()
        } else {
            profile.allergies.as_str()
        };
        let weight = profile.weight.to_string();

        Ok(render_template(
            &self.catalog.meal_plan,
            &[
                ("preferred_foods", &profile.preferred_foods),
                ("allergies", allergies),
                ("weight", &weight),
                ("height_line", &height_line),
                ("goal", self.catalog.goals.phrase(profile.goal)),
            ],
        ))
    }

    /// The static verification prompt.
    #[must_use]
    pub fn verification(&self) -> String {
        self.catalog.verification.clone()
    }
}
