//! SMTP client
//!
//! Async delivery of a [`MailMessage`] using tokio and tokio-native-tls.
//! Supports implicit TLS, STARTTLS and plain connections with optional
//! AUTH PLAIN.

use std::time::Duration;

use base64::Engine;
use chrono::Utc;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
    time::timeout,
};
use tokio_native_tls::TlsStream;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    MailMessage, SmtpConfig, SmtpError, SmtpSecurity,
    message::dot_stuff,
    session::SmtpSession,
    tls::build_tls_connector,
};

/// Async SMTP client
#[derive(Debug, Clone)]
pub struct SmtpClient {
    config: SmtpConfig,
}

impl SmtpClient {
    pub const fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &SmtpConfig {
        &self.config
    }

    /// Deliver a message to all of its recipients in one transaction
    ///
    /// Returns the generated Message-ID. Nothing is retried.
    #[instrument(skip(self, message), fields(host = %self.config.host, port = self.config.port))]
    pub async fn send(&self, message: &MailMessage) -> Result<String, SmtpError> {
        message.validate()?;

        let message_id = format!(
            "<{}.{}@{}>",
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple(),
            Self::extract_domain(&message.from)
        );
        let boundary = format!("=_wikireport_{}", uuid::Uuid::new_v4().simple());
        let content = message.format(&message_id, &Utc::now(), &boundary);

        debug!(
            recipients = message.to.len(),
            attachments = message.attachments.len(),
            size_bytes = content.len(),
            "Sending message"
        );

        let stream = self.connect().await?;
        let timeout_secs = self.config.timeout_secs;
        match self.config.security {
            SmtpSecurity::Implicit => {
                let tls = self.tls_handshake(stream).await?;
                let session = SmtpSession::new(tls, timeout_secs);
                self.transaction(session, true, message, &content).await?;
            },
            SmtpSecurity::StartTls => {
                let tls = self.starttls(stream).await?;
                // Greeting already consumed before the upgrade
                let session = SmtpSession::new(tls, timeout_secs);
                self.transaction(session, false, message, &content).await?;
            },
            SmtpSecurity::None => {
                let session = SmtpSession::new(stream, timeout_secs);
                self.transaction(session, true, message, &content).await?;
            },
        }

        info!(message_id = %message_id, "Message accepted by SMTP server");
        Ok(message_id)
    }

    async fn connect(&self) -> Result<TcpStream, SmtpError> {
        let addr = (self.config.host.as_str(), self.config.port);
        timeout(
            Duration::from_secs(self.config.timeout_secs),
            TcpStream::connect(addr),
        )
        .await
        .map_err(|_| SmtpError::Timeout {
            timeout_secs: self.config.timeout_secs,
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to connect to SMTP server");
            SmtpError::ConnectionFailed(format!(
                "{}:{}: {e}",
                self.config.host, self.config.port
            ))
        })
    }

    async fn tls_handshake(&self, stream: TcpStream) -> Result<TlsStream<TcpStream>, SmtpError> {
        let connector = build_tls_connector(&self.config.tls)?;
        timeout(
            Duration::from_secs(self.config.timeout_secs),
            connector.connect(&self.config.host, stream),
        )
        .await
        .map_err(|_| SmtpError::Timeout {
            timeout_secs: self.config.timeout_secs,
        })?
        .map_err(|e| SmtpError::Tls(format!("TLS handshake failed: {e}")))
    }

    /// Greeting, EHLO and STARTTLS on the plain connection, then the upgrade
    async fn starttls(&self, stream: TcpStream) -> Result<TlsStream<TcpStream>, SmtpError> {
        let mut session = SmtpSession::new(stream, self.config.timeout_secs);
        session.read_reply().await?.ensure("greeting", &[220])?;

        let ehlo = session
            .command(&format!("EHLO {}", self.helo_name()))
            .await?
            .ensure("EHLO", &[250])?;
        if !ehlo.has_extension("STARTTLS") {
            return Err(SmtpError::Tls(
                "server does not offer STARTTLS".to_string(),
            ));
        }

        session.command("STARTTLS").await?.ensure("STARTTLS", &[220])?;
        self.tls_handshake(session.into_inner()).await
    }

    /// EHLO, AUTH, envelope and DATA
    async fn transaction<S>(
        &self,
        mut session: SmtpSession<S>,
        expect_greeting: bool,
        message: &MailMessage,
        content: &str,
    ) -> Result<(), SmtpError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if expect_greeting {
            session.read_reply().await?.ensure("greeting", &[220])?;
        }

        session
            .command(&format!("EHLO {}", self.helo_name()))
            .await?
            .ensure("EHLO", &[250])?;

        if let Some(username) = &self.config.username {
            let password = self.config.password.as_deref().unwrap_or_default();
            let credentials = format!("\0{username}\0{password}");
            let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
            let reply = session.command(&format!("AUTH PLAIN {encoded}")).await?;
            if reply.code != 235 {
                warn!(code = reply.code, "SMTP authentication rejected");
                return Err(SmtpError::AuthenticationFailed(format!(
                    "{} {}",
                    reply.code,
                    reply.text()
                )));
            }
        }

        session
            .command(&format!("MAIL FROM:<{}>", message.from.trim()))
            .await?
            .ensure("MAIL", &[250])?;

        for recipient in message.to.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
            session
                .command(&format!("RCPT TO:<{recipient}>"))
                .await?
                .ensure("RCPT", &[250, 251])?;
        }

        session.command("DATA").await?.ensure("DATA", &[354])?;

        let mut payload = dot_stuff(content);
        if !payload.ends_with("\r\n") {
            payload.push_str("\r\n");
        }
        payload.push_str(".\r\n");
        session.write_all(payload.as_bytes()).await?;
        session.read_reply().await?.ensure("DATA", &[250])?;

        // The server may close right after QUIT
        if let Err(e) = session.command("QUIT").await {
            debug!(error = %e, "QUIT not acknowledged");
        }
        Ok(())
    }

    fn helo_name(&self) -> String {
        self.config.helo_name.clone().unwrap_or_else(|| {
            hostname::get().map_or_else(
                |_| "localhost".to_string(),
                |h| h.to_string_lossy().to_string(),
            )
        })
    }

    /// Extracts the domain part of an address for the Message-ID
    fn extract_domain(email: &str) -> &str {
        email
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim())
            .filter(|d| !d.is_empty())
            .unwrap_or("wikireport.local")
    }
}
