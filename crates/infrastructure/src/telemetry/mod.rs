//! Logging initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a fmt
//! layer writing to stderr, so stdout stays free for command output.

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryAppConfig;

/// Telemetry initialisation errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Pick the filter directive
///
/// An explicit CLI override wins, then `RUST_LOG`, then the configured filter.
#[must_use]
pub fn resolve_directive(
    config: &TelemetryAppConfig,
    cli_override: Option<&str>,
    rust_log: Option<&str>,
) -> String {
    cli_override
        .or_else(|| rust_log.filter(|v| !v.trim().is_empty()))
        .unwrap_or(&config.log_filter)
        .to_string()
}

/// Build an `EnvFilter` from a directive string
pub fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init_logging(
    config: &TelemetryAppConfig,
    cli_override: Option<&str>,
) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = resolve_directive(config, cli_override, rust_log.as_deref());
    let filter = build_filter(&directive)?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(filter = %directive, json = config.json, "Logging initialized");
    Ok(())
}
