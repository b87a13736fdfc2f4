//! # platewise app layer
//!
//! Drives the two user-facing workflows on top of `platewise-core` and
//! `platewise-llm`:
//!
//! - **Meal plan**: profile → prompt → inference → [`MealPlan`](platewise_core::MealPlan)
//! - **Verification**: plate image → inference → [`VerificationResult`](platewise_core::VerificationResult)
//!
//! A [`Session`] owns the profile, the active [`View`] and both workflows.
//! Rendering is left to the caller: every piece of state is published through
//! `tokio::sync::watch` channels.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod ingest;
pub mod session;
pub mod telemetry;
pub mod workflow;

pub use error::{AppError, WorkflowError};
pub use ingest::ingest;
pub use session::{Session, View};
pub use telemetry::init_tracing;
pub use workflow::{
    MealPlanPhase, MealPlanSnapshot, MealPlanWorkflow, TriggerOutcome, VerificationPhase,
    VerificationSnapshot, VerificationWorkflow,
};
