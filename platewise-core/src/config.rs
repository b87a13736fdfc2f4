//! Configuration for platewise.
//!
//! Maps directly to `platewise.toml`. Every field has a default, so an empty
//! file (or no file) is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::prompt::PromptCatalog;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatewiseConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Inference service settings.
    #[serde(default)]
    pub inference: InferenceConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlatewiseConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the TOML is invalid or fails
    /// [`validate`](Self::validate).
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| crate::CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot work.
    ///
    /// # Errors
    /// Returns `CoreError::Config` for a zero request timeout.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.inference.timeout_secs == 0 {
            return Err(crate::CoreError::Config(
                "inference.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Resolve the prompt catalog: the configured file if any, else the
    /// built-in catalog for the configured locale.
    ///
    /// # Errors
    /// Returns an error if a configured catalog file cannot be loaded.
    pub fn prompt_catalog(&self) -> crate::error::Result<PromptCatalog> {
        match &self.general.prompt_catalog {
            Some(path) => PromptCatalog::from_file(path),
            None => Ok(PromptCatalog::builtin(self.general.locale)),
        }
    }
}

/// General settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Language for prompts and notices.
    #[serde(default)]
    pub locale: Locale,
    /// Optional TOML prompt catalog replacing the built-in one.
    #[serde(default)]
    pub prompt_catalog: Option<PathBuf>,
}

/// Inference service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// API base URL, without the `/models/...` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// When set, asks the service for this response MIME type
    /// (e.g. `application/json`).
    #[serde(default)]
    pub response_mime_type: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            response_mime_type: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of compact text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
