//! # platewise core library
//!
//! Transport-agnostic domain logic for daily meal planning and post-meal
//! plate verification:
//!
//! - **Profile**: the user's editable nutrition profile and derived BMI
//! - **Prompts**: rendering profiles into the exact instructions the
//!   inference service expects, with a fixed JSON reply schema
//! - **Parsing**: turning the free-form reply into a [`MealPlan`] or
//!   [`VerificationResult`], or a [`ParseFailure`]
//! - **Images**: base64 payloads tagged with their MIME type
//!
//! Nothing here performs I/O against the service; see `platewise-llm` for the
//! client and `platewise-app` for the workflows that drive both.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod image;
pub mod locale;
pub mod meal_plan;
pub mod parser;
pub mod profile;
pub mod prompt;
pub mod verification;

pub use config::PlatewiseConfig;
pub use error::{CoreError, ParseFailure, ValidationFailure};
pub use image::{ImageError, UploadedImage};
pub use locale::{Locale, Notice};
pub use meal_plan::{Meal, MealPlan, MealSlot};
pub use profile::{Goal, ProfileField, UserProfile};
pub use prompt::{PromptBuilder, PromptCatalog};
pub use verification::VerificationResult;
