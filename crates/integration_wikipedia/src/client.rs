//! Wikipedia page client
//!
//! Plain HTTP GET of article pages with a per-request timeout. Redirects are
//! followed up to a configured limit.

use std::time::{Duration, Instant};

use reqwest::{Client, redirect::Policy};
use tracing::{debug, instrument};

use crate::{config::WikipediaConfig, error::WikipediaError, models::PageResponse};

/// HTTP client for Wikipedia article pages
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: Client,
}

impl WikipediaClient {
    /// Create a new Wikipedia client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &WikipediaConfig) -> Result<Self, WikipediaError> {
        if config.user_agent.trim().is_empty() {
            return Err(WikipediaError::ConfigurationError(
                "user_agent must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| WikipediaError::ConfigurationError(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch a page, giving up after `timeout_secs`
    ///
    /// Every HTTP status is returned as `Ok`; only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns [`WikipediaError::Timeout`] when the deadline passes, and
    /// [`WikipediaError::ConnectionFailed`] or [`WikipediaError::RequestFailed`]
    /// for other transport problems.
    #[instrument(skip(self))]
    pub async fn fetch_page(
        &self,
        url: &str,
        timeout_secs: u64,
    ) -> Result<PageResponse, WikipediaError> {
        let start = Instant::now();
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                WikipediaError::Timeout { timeout_secs }
            } else if e.is_connect() {
                WikipediaError::ConnectionFailed(e.to_string())
            } else {
                WikipediaError::RequestFailed(e.to_string())
            }
        };

        debug!("Sending Wikipedia request");
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(map_err)?;

        debug!(
            status,
            final_url = %final_url,
            body_bytes = body.len(),
            time_ms = start.elapsed().as_millis(),
            "Received Wikipedia response"
        );

        Ok(PageResponse {
            status,
            body,
            final_url,
        })
    }
}
