//! Structured logging setup.

use std::env;
use std::io;

use platewise_core::config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::AppError;

/// Build the filter: `RUST_LOG` when set, otherwise the configured level,
/// with HTTP client chatter held at `warn`.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    env::var("RUST_LOG")
        .map_or_else(
            |_| EnvFilter::new(&config.level),
            |directive| EnvFilter::new(&directive),
        )
        .add_directive(
            "hyper=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "reqwest=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
}

/// Install the global subscriber.
///
/// # Errors
/// Returns [`AppError::Telemetry`] if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), AppError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if config.json {
        registry
            .with(fmt::layer().with_target(true).with_writer(io::stderr).json())
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Telemetry(e.to_string()))?;
    tracing::debug!(level = %config.level, json = config.json, "Logging initialised");
    Ok(())
}
