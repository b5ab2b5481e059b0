//! Result of looking up a subject term on the encyclopedia

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary text used when a page has no usable paragraph
pub const NO_INFORMATION: &str = "no information available";

/// Outcome of the fetch + extract step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LookupStatus {
    /// Page was fetched and a summary extracted
    Found,
    /// The upstream reported that no page exists for the term
    NotFound,
    /// Fetch failed or returned an unexpected status
    UpstreamError(String),
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found => f.write_str("found"),
            Self::NotFound => f.write_str("not found"),
            Self::UpstreamError(detail) => write!(f, "upstream error ({detail})"),
        }
    }
}

/// A looked-up subject term
///
/// Built once by the lookup step (or supplied by a caller re-delivering
/// results it already showed) and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    subject_term: String,
    summary_text: String,
    source_url: String,
    status: LookupStatus,
}

impl LookupResult {
    /// A successful lookup
    pub fn found(
        subject_term: impl Into<String>,
        summary_text: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            subject_term: subject_term.into(),
            summary_text: summary_text.into(),
            source_url: source_url.into(),
            status: LookupStatus::Found,
        }
    }

    /// The upstream has no page for the term
    pub fn not_found(subject_term: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            subject_term: subject_term.into(),
            summary_text: String::new(),
            source_url: source_url.into(),
            status: LookupStatus::NotFound,
        }
    }

    /// The fetch failed; `detail` describes why
    pub fn upstream_error(
        subject_term: impl Into<String>,
        source_url: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            subject_term: subject_term.into(),
            summary_text: String::new(),
            source_url: source_url.into(),
            status: LookupStatus::UpstreamError(detail.into()),
        }
    }

    pub fn subject_term(&self) -> &str {
        &self.subject_term
    }

    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub const fn status(&self) -> &LookupStatus {
        &self.status
    }

    pub const fn is_found(&self) -> bool {
        matches!(self.status, LookupStatus::Found)
    }

    /// Text to put into the report body
    ///
    /// Absence and failure are stated explicitly so a report never looks
    /// like an empty success.
    pub fn report_body(&self) -> String {
        match &self.status {
            LookupStatus::Found if self.summary_text.trim().is_empty() => {
                NO_INFORMATION.to_string()
            },
            LookupStatus::Found => self.summary_text.clone(),
            LookupStatus::NotFound => format!(
                "Article not found: there is no encyclopedia page for \"{}\".",
                self.subject_term
            ),
            LookupStatus::UpstreamError(detail) => format!(
                "The article for \"{}\" could not be retrieved (upstream error: {detail}).",
                self.subject_term
            ),
        }
    }
}
