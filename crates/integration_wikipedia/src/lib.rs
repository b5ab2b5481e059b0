#![forbid(unsafe_code)]
//! Wikipedia integration for wikireport
//!
//! Fetches article pages over HTTP and returns the raw status and body.
//! Interpreting the page (summary extraction, missing articles) is left to
//! the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_wikipedia::{WikipediaClient, WikipediaConfig};
//!
//! let client = WikipediaClient::new(&WikipediaConfig::default())?;
//! let page = client.fetch_page("https://es.wikipedia.org/wiki/Rust", 10).await?;
//! println!("{} ({} bytes)", page.status, page.body.len());
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::WikipediaClient;
pub use config::WikipediaConfig;
pub use error::WikipediaError;
pub use models::PageResponse;
