#![forbid(unsafe_code)]
//! SMTP integration for wikireport
//!
//! A small async SMTP client built on tokio. Sends one `multipart/mixed`
//! message per call to any number of recipients, over implicit TLS,
//! STARTTLS or a plain connection.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_smtp::{Attachment, MailMessage, SmtpClient, SmtpConfig};
//!
//! let client = SmtpClient::new(SmtpConfig::default());
//! let message = MailMessage::new("reports@example.org", vec!["ana@example.org".into()], "Hi", "Body")
//!     .with_attachment(Attachment::new("report.pdf", "application/pdf", bytes));
//! let message_id = client.send(&message).await?;
//! ```

mod client;
mod config;
mod error;
mod message;
mod session;
mod tls;

pub use client::SmtpClient;
pub use config::{SmtpConfig, SmtpSecurity, TlsConfig};
pub use error::SmtpError;
pub use message::{Attachment, MailMessage};
