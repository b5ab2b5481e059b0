//! Adapters implementing application ports

mod smtp_mailer_adapter;
mod unconfigured_mailer;
mod wikipedia_fetch_adapter;

pub use smtp_mailer_adapter::SmtpMailerAdapter;
pub use unconfigured_mailer::{UNCONFIGURED_DETAIL, UnconfiguredMailer};
pub use wikipedia_fetch_adapter::WikipediaFetchAdapter;
