//! Report pipeline configuration

use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Options recognised by the report pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sender address; `None` leaves the choice to the mail transport
    #[serde(default)]
    pub default_from_address: Option<String>,

    /// Timeout for the article fetch in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Hard cap on report body characters
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,

    /// Line width of the report body in characters
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    /// Article URLs are this base plus the encoded subject term
    #[serde(default = "default_article_base_url")]
    pub article_base_url: String,
}

const fn default_fetch_timeout_secs() -> u64 {
    10
}

const fn default_max_body_chars() -> usize {
    900
}

const fn default_wrap_width() -> usize {
    90
}

fn default_article_base_url() -> String {
    "https://es.wikipedia.org/wiki".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_from_address: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_body_chars: default_max_body_chars(),
            wrap_width: default_wrap_width(),
            article_base_url: default_article_base_url(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`] describing the first invalid option.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ApplicationError::Configuration(
                "fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_body_chars == 0 {
            return Err(ApplicationError::Configuration(
                "max_body_chars must be greater than 0".to_string(),
            ));
        }
        if !(20..=120).contains(&self.wrap_width) {
            return Err(ApplicationError::Configuration(
                "wrap_width must be between 20 and 120".to_string(),
            ));
        }
        if url::Url::parse(&self.article_base_url).is_err() {
            return Err(ApplicationError::Configuration(format!(
                "article_base_url is not a valid URL: {}",
                self.article_base_url
            )));
        }
        if let Some(ref from) = self.default_from_address {
            domain::EmailAddress::new(from.as_str())?;
        }
        Ok(())
    }
}
