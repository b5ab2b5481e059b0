//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Recipient input resolved to an empty list
    #[error("No recipients: enter at least one email address")]
    NoRecipients,

    /// Invalid email address format
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),
}
