//! Trigger → call → parse → publish state machines.
//!
//! Each workflow keeps its state in a `tokio::sync::watch` channel: the UI
//! collaborator reads the latest snapshot or subscribes to changes. The busy
//! phase is entered with a compare-and-set on that channel, so a trigger that
//! arrives while a call is in flight is ignored rather than queued.
//!
//! The two workflows share nothing and may run concurrently.

pub mod meal_plan;
pub mod verification;

use tokio::sync::watch;

use crate::error::WorkflowError;
use platewise_core::ValidationFailure;

pub use meal_plan::{MealPlanPhase, MealPlanSnapshot, MealPlanWorkflow};
pub use verification::{VerificationPhase, VerificationSnapshot, VerificationWorkflow};

/// What happened to a trigger.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// A new result was published.
    Completed,
    /// Required input was missing; a validation notice was published and no
    /// call was made.
    Rejected(ValidationFailure),
    /// A call was already in flight; nothing changed.
    Ignored,
    /// The call or the parse failed; a failure notice was published.
    Failed(WorkflowError),
    /// The call finished after its input was replaced; the result was dropped.
    Superseded,
}

impl TriggerOutcome {
    /// Whether a new result was published.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A snapshot type with a busy phase.
pub(crate) trait Busy {
    /// Enter the busy phase. Returns false if already busy.
    fn try_begin(&mut self) -> bool;

    /// Leave the busy phase without a result.
    fn abandon(&mut self);
}

/// Holds a workflow in its busy phase.
///
/// Settling publishes the outcome; dropping an unsettled guard (e.g. when the
/// triggering future is dropped mid-call) abandons the run, so the busy phase
/// is always released.
pub(crate) struct BusyGuard<'a, S: Busy> {
    state: &'a watch::Sender<S>,
    settled: bool,
}

impl<'a, S: Busy> BusyGuard<'a, S> {
    /// Enter the busy phase, or `None` if a run is already in flight.
    pub(crate) fn acquire(state: &'a watch::Sender<S>) -> Option<Self> {
        // `then`, not `then_some`: an eagerly built guard would drop and abandon.
        state.send_if_modified(S::try_begin).then(|| Self {
            state,
            settled: false,
        })
    }

    /// Publish the outcome and release the busy phase.
    pub(crate) fn settle(mut self, apply: impl FnOnce(&mut S)) {
        self.settled = true;
        self.state.send_modify(apply);
    }
}

impl<S: Busy> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("Workflow run abandoned before settling");
            self.state.send_modify(S::abandon);
        }
    }
}
