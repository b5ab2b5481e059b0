//! SMTP mailer adapter - Implements MailerPort using integration_smtp

use application::ports::{MailerError, MailerPort, OutgoingMail};
use async_trait::async_trait;
use domain::EmailAddress;
use integration_smtp::{Attachment, MailMessage, SmtpClient, SmtpConfig, SmtpError};
use tracing::{debug, info, instrument, warn};

use crate::config::SmtpAppConfig;

/// Adapter delivering reports through an SMTP server
#[derive(Debug)]
pub struct SmtpMailerAdapter {
    client: SmtpClient,
    from_address: String,
}

impl SmtpMailerAdapter {
    /// Create a new adapter; `from_address` is used when a mail names no sender
    pub fn new(config: SmtpConfig, from_address: impl Into<String>) -> Self {
        Self {
            client: SmtpClient::new(config),
            from_address: from_address.into(),
        }
    }

    /// Create from the `[smtp]` configuration section
    pub fn from_app_config(config: &SmtpAppConfig) -> Self {
        Self::new(config.to_smtp_config(), config.from_address.clone())
    }

    /// Map SmtpError to MailerError
    fn map_error(e: SmtpError) -> MailerError {
        match e {
            SmtpError::ConnectionFailed(_) | SmtpError::Timeout { .. } | SmtpError::Protocol(_) => {
                MailerError::ServiceUnavailable(e.to_string())
            },
            SmtpError::AuthenticationFailed(_) => MailerError::AuthenticationFailed,
            SmtpError::Rejected { .. } => MailerError::Rejected(e.to_string()),
            SmtpError::Tls(_) | SmtpError::InvalidMessage(_) => {
                MailerError::TransportFailed(e.to_string())
            },
        }
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<MailMessage, MailerError> {
        let from = mail.from.as_deref().unwrap_or(&self.from_address);
        let from = EmailAddress::new(from)
            .map_err(|_| MailerError::InvalidAddress(from.to_string()))?;

        let to = mail
            .to
            .iter()
            .map(|recipient| {
                EmailAddress::new(recipient)
                    .map(String::from)
                    .map_err(|_| MailerError::InvalidAddress(recipient.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let attachment = Attachment::new(
            mail.attachment.filename.as_str(),
            mail.attachment.mime_type.as_str(),
            mail.attachment.bytes.clone(),
        );

        Ok(
            MailMessage::new(from.as_str(), to, mail.subject.as_str(), mail.body.as_str())
                .with_attachment(attachment),
        )
    }
}

#[async_trait]
impl MailerPort for SmtpMailerAdapter {
    #[instrument(skip(self, mail), fields(recipients = mail.to.len(), attachment = %mail.attachment.filename))]
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailerError> {
        let message = self.build_message(mail)?;
        debug!(from = %message.from, subject = %message.subject, "Sending report via SMTP");

        match self.client.send(&message).await {
            Ok(message_id) => {
                info!(message_id = %message_id, "Report delivered to SMTP server");
                Ok(())
            },
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "SMTP delivery failed");
                Err(Self::map_error(e))
            },
        }
    }
}
