//! Wikipedia client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Wikipedia client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikipediaConfig {
    /// User-Agent header; Wikimedia rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of redirects to follow
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_user_agent() -> String {
    format!(
        "wikireport/{} (report generator; contact via project maintainers)",
        env!("CARGO_PKG_VERSION")
    )
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_max_redirects() -> usize {
    5
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl WikipediaConfig {
    /// Create a configuration for testing (short timeouts)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            user_agent: "wikireport-tests/0.0".to_string(),
            connect_timeout_secs: 1,
            ..Default::default()
        }
    }
}
