//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod fetch_port;
mod mailer_port;

#[cfg(test)]
pub use fetch_port::MockFetchPort;
pub use fetch_port::{FetchError, FetchPort, FetchResponse};
#[cfg(test)]
pub use mailer_port::MockMailerPort;
pub use mailer_port::{MailAttachment, MailerError, MailerPort, OutgoingMail};
