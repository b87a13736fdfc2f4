//! Meal-plan generation: `Idle → Generating → {Ready, Failed}`.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use platewise_core::parser;
use platewise_core::{MealPlan, Notice, PromptBuilder, UserProfile};
use platewise_llm::{Inference, LlmRequest};

use super::{Busy, BusyGuard, TriggerOutcome};
use crate::error::WorkflowError;

/// Where the meal-plan workflow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MealPlanPhase {
    /// Nothing generated yet.
    #[default]
    Idle,
    /// A call is in flight; triggers are ignored.
    Generating,
    /// The last run produced a plan.
    Ready,
    /// The last run failed.
    Failed,
}

/// Everything the meal-plan view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealPlanSnapshot {
    /// Current phase.
    pub phase: MealPlanPhase,
    /// Latest successful plan. Survives later failures; replaced only by the
    /// next success.
    pub plan: Option<MealPlan>,
    /// Notice to show, if any.
    pub notice: Option<Notice>,
    /// Number of runs started.
    pub runs: u64,
}

impl MealPlanSnapshot {
    /// Whether the trigger should be rendered inert.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase == MealPlanPhase::Generating
    }
}

impl Busy for MealPlanSnapshot {
    fn try_begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.phase = MealPlanPhase::Generating;
        self.notice = None;
        self.runs += 1;
        true
    }

    fn abandon(&mut self) {
        self.phase = if self.plan.is_some() {
            MealPlanPhase::Ready
        } else {
            MealPlanPhase::Idle
        };
    }
}

/// Builds a prompt from the profile, calls the service, parses a
/// [`MealPlan`] and publishes it.
pub struct MealPlanWorkflow<C> {
    client: Arc<C>,
    prompts: Arc<PromptBuilder>,
    state: watch::Sender<MealPlanSnapshot>,
}

impl<C: Inference> MealPlanWorkflow<C> {
    /// Create an idle workflow.
    #[must_use]
    pub fn new(client: Arc<C>, prompts: Arc<PromptBuilder>) -> Self {
        let (state, _) = watch::channel(MealPlanSnapshot::default());
        Self {
            client,
            prompts,
            state,
        }
    }

    /// Latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> MealPlanSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MealPlanSnapshot> {
        self.state.subscribe()
    }

    /// Whether a generation call is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    /// Generate a plan for `profile`.
    ///
    /// Ignored while a call is in flight. An incomplete profile publishes a
    /// validation notice and leaves the phase unchanged.
    pub async fn generate(&self, profile: &UserProfile) -> TriggerOutcome {
        if self.is_busy() {
            debug!("Meal plan generation already in flight, ignoring trigger");
            return TriggerOutcome::Ignored;
        }

        let prompt = match self.prompts.meal_plan(profile) {
            Ok(prompt) => prompt,
            Err(failure) => {
                debug!(%failure, "Meal plan trigger rejected");
                self.state
                    .send_modify(|s| s.notice = Some(Notice::ProfileIncomplete));
                return TriggerOutcome::Rejected(failure);
            }
        };

        let Some(guard) = BusyGuard::acquire(&self.state) else {
            return TriggerOutcome::Ignored;
        };
        info!(goal = %profile.goal, "Generating meal plan");

        match self.run(prompt).await {
            Ok(plan) => {
                info!(total_calories = plan.total_calories, "Meal plan ready");
                guard.settle(|s| {
                    s.plan = Some(plan);
                    s.phase = MealPlanPhase::Ready;
                });
                TriggerOutcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "Meal plan generation failed");
                guard.settle(|s| {
                    s.phase = MealPlanPhase::Failed;
                    s.notice = Some(Notice::GenerationFailed);
                });
                TriggerOutcome::Failed(err)
            }
        }
    }

    async fn run(&self, prompt: String) -> Result<MealPlan, WorkflowError> {
        let response = self.client.generate(&LlmRequest::text(prompt)).await?;
        Ok(parser::parse_meal_plan(&response.text)?)
    }
}
