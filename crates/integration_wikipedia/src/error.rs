//! Wikipedia error types

use thiserror::Error;

/// Errors that can occur while fetching a page
///
/// HTTP error statuses are not errors here; they come back in
/// [`PageResponse`](crate::PageResponse).
#[derive(Debug, Error)]
pub enum WikipediaError {
    /// Connection to the server failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request failed after connecting
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
