//! Plate verification: `NoImage → ImageSelected → Verifying → {Verified, Failed}`.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use platewise_core::parser;
use platewise_core::{Notice, PromptBuilder, UploadedImage, ValidationFailure, VerificationResult};
use platewise_llm::{Inference, LlmRequest};

use super::{Busy, BusyGuard, TriggerOutcome};
use crate::error::WorkflowError;

/// Where the verification workflow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationPhase {
    /// No image selected.
    #[default]
    NoImage,
    /// An image is ready to verify.
    ImageSelected,
    /// A call is in flight; triggers are ignored.
    Verifying,
    /// The selected image has a result.
    Verified,
    /// The last call for the selected image failed.
    Failed,
}

/// Everything the verification view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationSnapshot {
    /// Current phase.
    pub phase: VerificationPhase,
    /// Selected image.
    pub image: Option<Arc<UploadedImage>>,
    /// Result for the selected image. Cleared whenever the image changes.
    pub result: Option<VerificationResult>,
    /// Notice to show, if any.
    pub notice: Option<Notice>,
    /// Bumped on every image selection; a reply for an older epoch is stale.
    pub epoch: u64,
}

impl VerificationSnapshot {
    /// Whether the trigger should be rendered inert.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase == VerificationPhase::Verifying
    }

    /// Apply the reply for the image selected at `epoch`.
    ///
    /// Runs under the channel's write lock, so a selection cannot land
    /// between the staleness check and the publish.
    fn settle_reply(
        &mut self,
        epoch: u64,
        outcome: Result<VerificationResult, WorkflowError>,
    ) -> TriggerOutcome {
        if self.epoch != epoch {
            self.phase = VerificationPhase::ImageSelected;
            return TriggerOutcome::Superseded;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.phase = VerificationPhase::Verified;
                TriggerOutcome::Completed
            }
            Err(err) => {
                self.phase = VerificationPhase::Failed;
                self.notice = Some(Notice::VerificationFailed);
                TriggerOutcome::Failed(err)
            }
        }
    }
}

impl Busy for VerificationSnapshot {
    fn try_begin(&mut self) -> bool {
        if self.is_busy() || self.image.is_none() {
            return false;
        }
        self.phase = VerificationPhase::Verifying;
        self.notice = None;
        true
    }

    fn abandon(&mut self) {
        self.phase = if self.result.is_some() {
            VerificationPhase::Verified
        } else {
            VerificationPhase::ImageSelected
        };
    }
}

/// Sends the selected image with the fixed verification prompt, parses a
/// [`VerificationResult`] and publishes it.
pub struct VerificationWorkflow<C> {
    client: Arc<C>,
    prompts: Arc<PromptBuilder>,
    state: watch::Sender<VerificationSnapshot>,
}

impl<C: Inference> VerificationWorkflow<C> {
    /// Create a workflow with no image.
    #[must_use]
    pub fn new(client: Arc<C>, prompts: Arc<PromptBuilder>) -> Self {
        let (state, _) = watch::channel(VerificationSnapshot::default());
        Self {
            client,
            prompts,
            state,
        }
    }

    /// Latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> VerificationSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<VerificationSnapshot> {
        self.state.subscribe()
    }

    /// Whether a verification call is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    /// Replace the selected image and clear any previous result.
    ///
    /// Allowed in every phase. While a call is in flight the phase stays
    /// `Verifying`; that call's reply will be discarded as stale.
    pub fn select_image(&self, image: UploadedImage) {
        let image = Arc::new(image);
        self.state.send_modify(|s| {
            s.epoch += 1;
            s.image = Some(Arc::clone(&image));
            s.result = None;
            s.notice = None;
            if s.phase != VerificationPhase::Verifying {
                s.phase = VerificationPhase::ImageSelected;
            }
        });
        info!(
            mime_type = image.mime_type(),
            encoded_len = image.encoded_len(),
            "Plate image selected"
        );
    }

    /// Verify the selected image.
    ///
    /// Ignored while a call is in flight. Without an image, publishes a
    /// validation notice and makes no call.
    pub async fn verify(&self) -> TriggerOutcome {
        let (busy, has_image) = {
            let current = self.state.borrow();
            (current.is_busy(), current.image.is_some())
        };
        if busy {
            debug!("Verification already in flight, ignoring trigger");
            return TriggerOutcome::Ignored;
        }
        if !has_image {
            debug!("Verification trigger rejected: no image");
            self.state
                .send_modify(|s| s.notice = Some(Notice::ImageRequired));
            return TriggerOutcome::Rejected(ValidationFailure::MissingImage);
        }

        let Some(guard) = BusyGuard::acquire(&self.state) else {
            return TriggerOutcome::Ignored;
        };
        // Images are never unselected, so one is present once acquired.
        let (image, epoch) = {
            let current = self.state.borrow();
            (current.image.clone(), current.epoch)
        };
        let Some(image) = image else {
            return TriggerOutcome::Ignored;
        };
        info!(epoch, "Verifying plate image");

        let outcome = self.run(&image).await;

        let mut published = TriggerOutcome::Superseded;
        guard.settle(|s| published = s.settle_reply(epoch, outcome));

        match &published {
            TriggerOutcome::Completed => info!(epoch, "Plate verified"),
            TriggerOutcome::Failed(err) => warn!(error = %err, "Plate verification failed"),
            _ => debug!(epoch, "Discarding verification reply for a replaced image"),
        }
        published
    }

    async fn run(&self, image: &UploadedImage) -> Result<VerificationResult, WorkflowError> {
        let request =
            LlmRequest::text(self.prompts.verification()).with_image(image.mime_type(), image.data());
        let response = self.client.generate(&request).await?;
        Ok(parser::parse_verification(&response.text)?)
    }
}
