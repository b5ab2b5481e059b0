//! Terminal value of a report run

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::RecipientSet;

/// How a delivery attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Message accepted by the mail transport
    Sent,
    /// Recipient input was empty; nothing was built or sent
    NoRecipients,
    /// The report could not be built or the transport failed
    TransportError(String),
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => f.write_str("sent"),
            Self::NoRecipients => f.write_str("no recipients"),
            Self::TransportError(_) => f.write_str("transport error"),
        }
    }
}

/// What the caller gets back from a report run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Resolved recipients; `None` when resolution failed
    pub recipients: Option<RecipientSet>,
    /// Name of the attachment that was built, if any
    pub attachment_name: Option<String>,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub const fn no_recipients() -> Self {
        Self {
            recipients: None,
            attachment_name: None,
            status: DeliveryStatus::NoRecipients,
        }
    }

    pub fn sent(recipients: RecipientSet, attachment_name: impl Into<String>) -> Self {
        Self {
            recipients: Some(recipients),
            attachment_name: Some(attachment_name.into()),
            status: DeliveryStatus::Sent,
        }
    }

    pub fn transport_error(
        recipients: RecipientSet,
        attachment_name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            recipients: Some(recipients),
            attachment_name: Some(attachment_name.into()),
            status: DeliveryStatus::TransportError(detail.into()),
        }
    }

    /// The report could not be built, so nothing was handed to the transport
    pub fn rendering_failed(recipients: RecipientSet, detail: impl Into<String>) -> Self {
        Self {
            recipients: Some(recipients),
            attachment_name: None,
            status: DeliveryStatus::TransportError(detail.into()),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, DeliveryStatus::Sent)
    }

    /// Primary human-readable status line
    pub fn message(&self) -> String {
        match (&self.status, &self.recipients) {
            (DeliveryStatus::Sent, Some(recipients)) => {
                format!("Report sent to {recipients}.")
            },
            (DeliveryStatus::Sent, None) => "Report sent.".to_string(),
            (DeliveryStatus::NoRecipients, _) => {
                "No recipients given. Enter at least one email address.".to_string()
            },
            (DeliveryStatus::TransportError(_), _) => {
                "The report could not be sent. Please try again later.".to_string()
            },
        }
    }

    /// Technical detail, kept apart from [`message`](Self::message)
    pub fn detail(&self) -> Option<&str> {
        match &self.status {
            DeliveryStatus::TransportError(detail) => Some(detail),
            DeliveryStatus::Sent | DeliveryStatus::NoRecipients => None,
        }
    }
}
