//! Summary extraction from article markup

use domain::NO_INFORMATION;
use scraper::{Html, Selector};

/// Return the trimmed text of the first non-empty `<p>` in `markup`
///
/// Paragraphs are visited in document order; those with only whitespace
/// are skipped. Falls back to [`NO_INFORMATION`] when nothing usable is
/// found. The HTML parser recovers from any input, so malformed markup
/// simply yields fewer (or zero) paragraphs.
pub fn extract_summary(markup: &str) -> String {
    let Ok(paragraph) = Selector::parse("p") else {
        return NO_INFORMATION.to_string();
    };

    let document = Html::parse_document(markup);
    document
        .select(&paragraph)
        .map(|p| p.text().collect::<String>())
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| NO_INFORMATION.to_string())
}
