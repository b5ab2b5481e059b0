//! Wikipedia fetch adapter - Implements FetchPort using integration_wikipedia

use application::ports::{FetchError, FetchPort, FetchResponse};
use async_trait::async_trait;
use integration_wikipedia::{WikipediaClient, WikipediaConfig, WikipediaError};
use tracing::{debug, instrument, warn};

/// Adapter fetching article pages over HTTP
#[derive(Debug)]
pub struct WikipediaFetchAdapter {
    client: WikipediaClient,
}

impl WikipediaFetchAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &WikipediaConfig) -> Result<Self, WikipediaError> {
        Ok(Self {
            client: WikipediaClient::new(config)?,
        })
    }

    /// Every fetch failure is a network-level failure from the port's view
    fn map_error(e: WikipediaError) -> FetchError {
        FetchError::Network(e.to_string())
    }
}

#[async_trait]
impl FetchPort for WikipediaFetchAdapter {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str, timeout_secs: u64) -> Result<FetchResponse, FetchError> {
        let page = self
            .client
            .fetch_page(url, timeout_secs)
            .await
            .map_err(|e| {
                warn!(error = %e, "Page fetch failed");
                Self::map_error(e)
            })?;

        debug!(status = page.status, bytes = page.body.len(), "Page fetched");
        Ok(FetchResponse::new(page.status, page.body))
    }
}
