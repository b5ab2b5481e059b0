//! SMTP error types

use thiserror::Error;

/// Errors that can occur while delivering a message
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmtpError {
    /// TCP connection to the server failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// TLS setup or handshake failed
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server refused the credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server answered a command with an error reply
    #[error("{command} rejected with {code}: {message}")]
    Rejected {
        /// SMTP verb that was rejected
        command: String,
        /// Reply code
        code: u16,
        /// Reply text
        message: String,
    },

    /// Malformed reply or unexpected connection close
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No reply within the configured time
    #[error("SMTP server did not respond within {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The message cannot be sent as given
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl SmtpError {
    /// Returns true if a later attempt may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::Protocol(_) => true,
            Self::Rejected { code, .. } => *code >= 400 && *code < 500,
            Self::Tls(_) | Self::AuthenticationFailed(_) | Self::InvalidMessage(_) => false,
        }
    }
}
