//! Mailer used when no `[smtp]` section is configured
//!
//! Every send fails with a transport error, so a report run still resolves
//! recipients and builds the document before reporting the missing transport.

use application::ports::{MailerError, MailerPort, OutgoingMail};
use async_trait::async_trait;
use tracing::warn;

/// Detail reported for every send attempt
pub const UNCONFIGURED_DETAIL: &str = "SMTP is not configured (add an [smtp] section)";

#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMailer;

#[async_trait]
impl MailerPort for UnconfiguredMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailerError> {
        warn!(recipients = mail.to.len(), "Send attempted without SMTP configuration");
        Err(MailerError::TransportFailed(UNCONFIGURED_DETAIL.to_string()))
    }
}
