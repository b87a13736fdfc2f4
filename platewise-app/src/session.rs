//! The application session: one user's profile, the active view and both
//! workflows.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

use platewise_core::{
    ImageError, Locale, Notice, PlatewiseConfig, ProfileField, PromptBuilder, UploadedImage,
    UserProfile,
};
use platewise_llm::{ClientSettings, Inference, LlmClient};

use crate::error::AppError;
use crate::ingest::ingest;
use crate::workflow::{MealPlanWorkflow, TriggerOutcome, VerificationWorkflow};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Profile input.
    #[default]
    Profile,
    /// Generated meal plan.
    MealPlan,
    /// Plate verification.
    Verification,
}

impl View {
    /// All views in navigation order.
    #[must_use]
    pub fn all() -> &'static [View] {
        &[View::Profile, View::MealPlan, View::Verification]
    }
}

/// Holds everything the UI collaborator renders and every action it can
/// trigger.
pub struct Session<C> {
    locale: Locale,
    profile: RwLock<UserProfile>,
    view: watch::Sender<View>,
    meal_plan: MealPlanWorkflow<C>,
    verification: VerificationWorkflow<C>,
}

impl<C: Inference> Session<C> {
    /// Build a session around a client and prompt builder.
    #[must_use]
    pub fn new(client: Arc<C>, prompts: PromptBuilder) -> Self {
        let locale = prompts.catalog().locale;
        let prompts = Arc::new(prompts);
        let (view, _) = watch::channel(View::default());
        Self {
            locale,
            profile: RwLock::new(UserProfile::default()),
            view,
            meal_plan: MealPlanWorkflow::new(Arc::clone(&client), Arc::clone(&prompts)),
            verification: VerificationWorkflow::new(client, prompts),
        }
    }

    /// Language used for prompts and notices.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Current profile.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        self.profile.read().clone()
    }

    /// Replace one profile field from raw input text.
    pub fn edit_profile(&self, field: ProfileField, value: &str) {
        let mut profile = self.profile.write();
        *profile = profile.update(field, value);
        debug!(?field, "Profile edited");
    }

    /// Generate a meal plan from the current profile. On success the meal
    /// plan view becomes active.
    pub async fn generate_plan(&self) -> TriggerOutcome {
        let profile = self.profile();
        let outcome = self.meal_plan.generate(&profile).await;
        if outcome.is_completed() {
            self.select_view(View::MealPlan);
        }
        outcome
    }

    /// Read and select a plate image. On failure nothing changes.
    ///
    /// # Errors
    /// Returns [`ImageError`] if the file cannot be read or is not an image.
    pub async fn select_image(&self, path: &Path) -> Result<(), ImageError> {
        let image = ingest(path).await?;
        self.verification.select_image(image);
        Ok(())
    }

    /// Select an image already held in memory.
    ///
    /// # Errors
    /// Returns [`ImageError`] if the bytes are empty or not an image.
    pub fn select_image_bytes(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> Result<(), ImageError> {
        let image = UploadedImage::from_bytes(bytes, file_name)?;
        self.verification.select_image(image);
        Ok(())
    }

    /// Verify the selected plate image.
    pub async fn verify_plate(&self) -> TriggerOutcome {
        self.verification.verify().await
    }

    /// Active view.
    #[must_use]
    pub fn active_view(&self) -> View {
        *self.view.borrow()
    }

    /// Switch views. Workflow state is untouched.
    pub fn select_view(&self, view: View) {
        let changed = self.view.send_if_modified(|current| {
            let changed = *current != view;
            *current = view;
            changed
        });
        if changed {
            info!(?view, "View changed");
        }
    }

    /// Receive every view change.
    #[must_use]
    pub fn subscribe_view(&self) -> watch::Receiver<View> {
        self.view.subscribe()
    }

    /// Notice for `view`, in the session's language.
    ///
    /// The profile and meal plan views share the meal-plan workflow's notice.
    #[must_use]
    pub fn notice_text(&self, view: View) -> Option<&'static str> {
        let notice: Option<Notice> = match view {
            View::Profile | View::MealPlan => self.meal_plan.snapshot().notice,
            View::Verification => self.verification.snapshot().notice,
        };
        notice.map(|n| n.text(self.locale))
    }

    /// The meal-plan workflow.
    #[must_use]
    pub fn meal_plan(&self) -> &MealPlanWorkflow<C> {
        &self.meal_plan
    }

    /// The verification workflow.
    #[must_use]
    pub fn verification(&self) -> &VerificationWorkflow<C> {
        &self.verification
    }

    /// Whether a meal-plan call is in flight.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.meal_plan.is_busy()
    }

    /// Whether a verification call is in flight.
    #[must_use]
    pub fn is_verifying(&self) -> bool {
        self.verification.is_busy()
    }
}

impl Session<LlmClient> {
    /// Build a session backed by the HTTP client described in `config`.
    ///
    /// # Errors
    /// Returns an error if the config is invalid, the prompt catalog cannot
    /// be loaded or the API key variable is unset.
    pub fn from_config(config: &PlatewiseConfig) -> Result<Self, AppError> {
        config.validate()?;
        let catalog = config.prompt_catalog()?;
        let inference = &config.inference;
        let client = LlmClient::gemini_from_env(
            inference.base_url.clone(),
            &inference.api_key_env,
            ClientSettings {
                model: inference.model.clone(),
                timeout: Duration::from_secs(inference.timeout_secs),
                response_mime_type: inference.response_mime_type.clone(),
            },
        )?;
        info!(
            model = client.model(),
            locale = %catalog.locale,
            catalog_version = %catalog.version,
            "Session configured"
        );
        Ok(Self::new(Arc::new(client), PromptBuilder::new(catalog)))
    }
}
