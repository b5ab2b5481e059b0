//! Mailer port for application layer
//!
//! Defines the interface for sending one message with one attachment.
//! Implemented by adapters in the infrastructure layer.

use std::fmt;

use async_trait::async_trait;
use domain::{RecipientSet, ReportDocument};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Mailer port errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailerError {
    #[error("Mail service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Message rejected: {0}")]
    Rejected(String),

    #[error("Transport failed: {0}")]
    TransportFailed(String),
}

/// Binary attachment of an outgoing message
#[derive(Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl MailAttachment {
    pub fn new(
        filename: impl Into<String>,
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

impl From<ReportDocument> for MailAttachment {
    fn from(document: ReportDocument) -> Self {
        let filename = document.filename().to_string();
        let mime_type = document.mime_type().to_string();
        Self::new(filename, document.into_bytes(), mime_type)
    }
}

impl fmt::Debug for MailAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailAttachment")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// A single outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Sender; `None` lets the transport use its own default
    pub from: Option<String>,
    pub to: RecipientSet,
    pub attachment: MailAttachment,
}

/// Capability to deliver mail
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MailerPort: Send + Sync {
    /// Send the message to every recipient in one transaction
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailerError>;
}
