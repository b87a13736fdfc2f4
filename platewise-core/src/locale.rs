//! Display language for prompts and user-facing notices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language used when rendering prompts and notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Korean.
    #[default]
    Ko,
    /// English.
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ko => write!(f, "ko"),
            Self::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" => Ok(Self::Ko),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            other => Err(format!("unknown locale: '{other}'")),
        }
    }
}

/// User-facing notices raised by the workflows.
///
/// Workflows never expose error detail to the UI; each failure collapses to
/// one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Preferred foods or weight missing.
    ProfileIncomplete,
    /// Verification triggered with no image.
    ImageRequired,
    /// Any failure while generating a meal plan.
    GenerationFailed,
    /// Any failure while verifying a plate.
    VerificationFailed,
}

impl Notice {
    /// Localized message text.
    #[must_use]
    pub fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::ProfileIncomplete, Locale::Ko) => "선호 음식과 체중 정보를 입력해주세요.",
            (Self::ProfileIncomplete, Locale::En) => {
                "Please enter your preferred foods and weight."
            }
            (Self::ImageRequired, Locale::Ko) => "이미지를 먼저 업로드해주세요.",
            (Self::ImageRequired, Locale::En) => "Please upload an image first.",
            (Self::GenerationFailed, Locale::Ko) => "식단 생성 중 오류가 발생했습니다.",
            (Self::GenerationFailed, Locale::En) => {
                "Something went wrong while generating your meal plan."
            }
            (Self::VerificationFailed, Locale::Ko) => "이미지 분석 중 오류가 발생했습니다.",
            (Self::VerificationFailed, Locale::En) => {
                "Something went wrong while analysing the image."
            }
        }
    }

    /// Whether this notice reports a missing input rather than a failed call.
    #[must_use]
    pub fn is_validation(self) -> bool {
        matches!(self, Self::ProfileIncomplete | Self::ImageRequired)
    }
}
