//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The report document could not be produced
    #[error("Report rendering failed: {0}")]
    Rendering(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<lopdf::Error> for ApplicationError {
    fn from(err: lopdf::Error) -> Self {
        Self::Rendering(err.to_string())
    }
}
