//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the Wikipedia and SMTP
//! integrations, and owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::{SmtpMailerAdapter, UnconfiguredMailer, WikipediaFetchAdapter};
pub use config::{AppConfig, SmtpAppConfig, SmtpTlsAppConfig, TelemetryAppConfig, WikipediaAppConfig};
pub use telemetry::{TelemetryError, init_logging};
