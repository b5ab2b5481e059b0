//! Application configuration
//!
//! Split into focused sub-modules:
//! - `integrations`: Wikipedia client and SMTP delivery
//! - `telemetry`: log filter and output format
//!
//! The report pipeline options live in `application::PipelineConfig` and are
//! embedded here as the `pipeline` section.

mod integrations;
mod telemetry;

use std::path::Path;

use application::{ApplicationError, PipelineConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use integrations::{SmtpAppConfig, SmtpTlsAppConfig, WikipediaAppConfig};
pub use telemetry::TelemetryAppConfig;

/// Prefix of environment variable overrides, e.g. `WIKIREPORT__SMTP__HOST`
pub const ENV_PREFIX: &str = "WIKIREPORT";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Report pipeline options
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Wikipedia client options
    #[serde(default)]
    pub wikipedia: WikipediaAppConfig,

    /// Mail delivery; `None` disables sending
    #[serde(default)]
    pub smtp: Option<SmtpAppConfig>,

    /// Logging options
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load `./config.toml` (or `path` when given), then environment overrides
    ///
    /// An explicit path must exist; the implicit `config.toml` is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`AppConfig::load_from`] with an explicit environment map
    ///
    /// `None` reads the process environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                config::File::from(path).required(true)
            },
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., WIKIREPORT__SMTP__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first invalid option found.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.pipeline.validate()?;
        self.wikipedia.validate()?;
        if let Some(ref smtp) = self.smtp {
            smtp.validate()?;
        }
        Ok(())
    }
}
