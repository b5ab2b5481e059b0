//! Lookup service
//!
//! Resolves a subject term to its article, fetches it and maps the outcome
//! onto a [`LookupResult`]. Fetch failures never escape as errors; they
//! become `NotFound` or `UpstreamError` results.

use std::{fmt, sync::Arc};

use domain::LookupResult;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::text_extractor::extract_summary;
use crate::{
    config::PipelineConfig,
    error::ApplicationError,
    ports::{FetchError, FetchPort, FetchResponse},
};

/// Looks up encyclopedia articles by subject term
pub struct LookupService {
    fetch: Arc<dyn FetchPort>,
    base_url: Url,
    timeout_secs: u64,
}

impl fmt::Debug for LookupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupService")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl LookupService {
    pub fn new(fetch: Arc<dyn FetchPort>, base_url: Url, timeout_secs: u64) -> Self {
        Self {
            fetch,
            base_url,
            timeout_secs,
        }
    }

    /// Create a lookup service from pipeline configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`] if the article base URL is invalid.
    pub fn from_config(
        fetch: Arc<dyn FetchPort>,
        config: &PipelineConfig,
    ) -> Result<Self, ApplicationError> {
        let base_url = Url::parse(&config.article_base_url).map_err(|e| {
            ApplicationError::Configuration(format!("invalid article_base_url: {e}"))
        })?;
        Ok(Self::new(fetch, base_url, config.fetch_timeout_secs))
    }

    /// Article URL for a subject term
    ///
    /// Whitespace runs become `_` and the result is percent-encoded as a
    /// single path segment below the base URL.
    pub fn article_url(&self, subject_term: &str) -> String {
        let segment = subject_term.split_whitespace().collect::<Vec<_>>().join("_");
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&segment);
        }
        url.into()
    }

    /// Look up a subject term
    #[instrument(skip(self))]
    pub async fn lookup(&self, subject_term: &str) -> LookupResult {
        let term = subject_term.trim();
        if term.is_empty() {
            debug!("Blank subject term, skipping fetch");
            return LookupResult::not_found(term, self.base_url.as_str());
        }

        let url = self.article_url(term);
        info!(%url, "Fetching article");

        match self.fetch.fetch(&url, self.timeout_secs).await {
            Ok(response) => map_response(term, url, response),
            Err(FetchError::Network(detail)) => {
                warn!(%detail, "Article fetch failed");
                LookupResult::upstream_error(term, url, detail)
            },
        }
    }
}

fn map_response(term: &str, url: String, response: FetchResponse) -> LookupResult {
    match response.status_code {
        200 => {
            let summary = extract_summary(&response.body);
            debug!(summary_chars = summary.chars().count(), "Extracted summary");
            LookupResult::found(term, summary, url)
        },
        404 => {
            info!("No article for term");
            LookupResult::not_found(term, url)
        },
        code => {
            warn!(status = code, "Unexpected article status");
            LookupResult::upstream_error(term, url, format!("HTTP {code}"))
        },
    }
}

#[cfg(test)]
mod tests {
    use domain::{LookupStatus, NO_INFORMATION};
    use mockall::predicate::{always, eq};

    use super::*;
    use crate::ports::MockFetchPort;

    const BASE: &str = "https://es.wikipedia.org/wiki";

    fn service(fetch: MockFetchPort) -> LookupService {
        LookupService::new(Arc::new(fetch), Url::parse(BASE).unwrap(), 10)
    }

    #[test]
    fn article_url_encodes_term() {
        let service = service(MockFetchPort::new());
        assert_eq!(
            service.article_url("Buenos Aires"),
            "https://es.wikipedia.org/wiki/Buenos_Aires"
        );
        assert_eq!(
            service.article_url("  Río   de la Plata "),
            "https://es.wikipedia.org/wiki/R%C3%ADo_de_la_Plata"
        );
        assert_eq!(
            service.article_url("AC/DC"),
            "https://es.wikipedia.org/wiki/AC%2FDC"
        );
    }

    #[test]
    fn article_url_with_trailing_slash_base() {
        let service = LookupService::new(
            Arc::new(MockFetchPort::new()),
            Url::parse("http://localhost:8080/wiki/").unwrap(),
            5,
        );
        assert_eq!(service.article_url("Rust"), "http://localhost:8080/wiki/Rust");
    }

    #[tokio::test]
    async fn found_article_yields_first_paragraph() {
        let mut fetch = MockFetchPort::new();
        fetch
            .expect_fetch()
            .with(eq("https://es.wikipedia.org/wiki/Rust"), eq(10))
            .times(1)
            .returning(|_, _| {
                Ok(FetchResponse::new(
                    200,
                    "<p></p><p>Rust es un lenguaje.</p><p>Más.</p>",
                ))
            });

        let result = service(fetch).lookup("Rust").await;
        assert!(result.is_found());
        assert_eq!(result.summary_text(), "Rust es un lenguaje.");
        assert_eq!(result.source_url(), "https://es.wikipedia.org/wiki/Rust");
        assert_eq!(result.subject_term(), "Rust");
    }

    #[tokio::test]
    async fn page_without_paragraphs_is_found_with_sentinel() {
        let mut fetch = MockFetchPort::new();
        fetch
            .expect_fetch()
            .returning(|_, _| Ok(FetchResponse::new(200, "<div>infobox</div>")));

        let result = service(fetch).lookup("Rust").await;
        assert!(result.is_found());
        assert_eq!(result.summary_text(), NO_INFORMATION);
    }

    #[tokio::test]
    async fn missing_article_is_not_found() {
        let mut fetch = MockFetchPort::new();
        fetch
            .expect_fetch()
            .returning(|_, _| Ok(FetchResponse::new(404, "<p>Esta página no existe.</p>")));

        let result = service(fetch).lookup("Xyzzy Plugh").await;
        assert_eq!(result.status(), &LookupStatus::NotFound);
        assert_eq!(
            result.source_url(),
            "https://es.wikipedia.org/wiki/Xyzzy_Plugh"
        );
    }

    #[tokio::test]
    async fn server_error_is_upstream_error() {
        let mut fetch = MockFetchPort::new();
        fetch
            .expect_fetch()
            .returning(|_, _| Ok(FetchResponse::new(503, "busy")));

        let result = service(fetch).lookup("Rust").await;
        assert_eq!(
            result.status(),
            &LookupStatus::UpstreamError("HTTP 503".to_string())
        );
    }

    #[tokio::test]
    async fn network_failure_is_upstream_error() {
        let mut fetch = MockFetchPort::new();
        fetch
            .expect_fetch()
            .with(always(), always())
            .returning(|_, _| Err(FetchError::Network("connection refused".to_string())));

        let result = service(fetch).lookup("Rust").await;
        assert_eq!(
            result.status(),
            &LookupStatus::UpstreamError("connection refused".to_string())
        );
        assert!(result.report_body().contains("connection refused"));
    }

    #[tokio::test]
    async fn blank_term_never_fetches() {
        let mut fetch = MockFetchPort::new();
        fetch.expect_fetch().never();

        let result = service(fetch).lookup("   ").await;
        assert_eq!(result.status(), &LookupStatus::NotFound);
    }

    #[tokio::test]
    async fn from_config_uses_timeout() {
        let mut fetch = MockFetchPort::new();
        fetch
            .expect_fetch()
            .with(always(), eq(3))
            .times(1)
            .returning(|_, _| Ok(FetchResponse::new(404, "")));

        let config = PipelineConfig {
            fetch_timeout_secs: 3,
            ..Default::default()
        };
        let service = LookupService::from_config(Arc::new(fetch), &config).unwrap();
        let _ = service.lookup("Rust").await;
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let config = PipelineConfig {
            article_base_url: "::nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            LookupService::from_config(Arc::new(MockFetchPort::new()), &config),
            Err(ApplicationError::Configuration(_))
        ));
    }
}
