//! Page fetch port
//!
//! Fetches a URL and hands back the raw status and body. Status codes are
//! not interpreted here; mapping them to lookup outcomes is the caller's job.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Fetch port errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced an HTTP response (DNS, connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),
}

/// Raw HTTP response of a page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status_code: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// Capability to fetch a page over the network
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FetchPort: Send + Sync {
    /// Fetch `url`, giving up after `timeout_secs`
    ///
    /// Any HTTP status, including 4xx and 5xx, is returned as `Ok`.
    async fn fetch(&self, url: &str, timeout_secs: u64) -> Result<FetchResponse, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_response_creation() {
        let response = FetchResponse::new(404, "missing");
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, "missing");
    }

    #[test]
    fn fetch_error_display() {
        let err = FetchError::Network("dns failure".to_string());
        assert_eq!(err.to_string(), "Network error: dns failure");
    }

    #[tokio::test]
    async fn mock_fetch_port_returns_configured_response() {
        let mut mock = MockFetchPort::new();
        mock.expect_fetch()
            .withf(|url, timeout| url == "https://w/Rust" && *timeout == 5)
            .times(1)
            .returning(|_, _| Ok(FetchResponse::new(200, "<p>hi</p>")));

        let response = mock.fetch("https://w/Rust", 5).await.unwrap();
        assert_eq!(response.status_code, 200);
    }
}
