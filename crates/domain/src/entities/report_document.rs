//! Rendered report ready to be attached to a message

use std::fmt;

/// MIME type of every report document
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// An in-memory PDF report
///
/// Owned by the run that built it and dropped once handed to the mailer.
#[derive(Clone, PartialEq, Eq)]
pub struct ReportDocument {
    bytes: Vec<u8>,
    filename: String,
    page_count: usize,
}

impl ReportDocument {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, page_count: usize) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            page_count,
        }
    }

    /// Suggested attachment filename derived from the report title
    ///
    /// Alphanumerics, `-` and `_` are kept, whitespace runs become `_`,
    /// everything else is dropped.
    ///
    /// ```
    /// use domain::ReportDocument;
    ///
    /// assert_eq!(ReportDocument::filename_for("Buenos Aires"), "wiki_Buenos_Aires.pdf");
    /// assert_eq!(ReportDocument::filename_for("C++"), "wiki_C.pdf");
    /// assert_eq!(ReportDocument::filename_for("???"), "wiki_report.pdf");
    /// ```
    pub fn filename_for(title: &str) -> String {
        let mut slug = String::with_capacity(title.len());
        let mut pending_separator = false;
        for c in title.trim().chars() {
            if c.is_whitespace() {
                pending_separator = true;
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                if pending_separator && !slug.is_empty() {
                    slug.push('_');
                }
                pending_separator = false;
                slug.push(c);
            }
        }
        if slug.is_empty() {
            slug.push_str("report");
        }
        format!("wiki_{slug}.pdf")
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    pub const fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ReportDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportDocument")
            .field("filename", &self.filename)
            .field("page_count", &self.page_count)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_collapses_whitespace() {
        assert_eq!(
            ReportDocument::filename_for("  Rio   de la Plata "),
            "wiki_Rio_de_la_Plata.pdf"
        );
    }

    #[test]
    fn filename_keeps_unicode_letters() {
        assert_eq!(ReportDocument::filename_for("Córdoba"), "wiki_Córdoba.pdf");
    }

    #[test]
    fn filename_strips_path_characters() {
        assert_eq!(
            ReportDocument::filename_for("../etc/passwd"),
            "wiki_etcpasswd.pdf"
        );
    }

    #[test]
    fn debug_does_not_dump_bytes() {
        let doc = ReportDocument::new(vec![0u8; 2048], "wiki_x.pdf", 2);
        let debug = format!("{doc:?}");
        assert!(debug.contains("size_bytes: 2048"));
        assert!(debug.contains("page_count: 2"));
        assert_eq!(doc.mime_type(), "application/pdf");
        assert_eq!(doc.len(), 2048);
    }
}
