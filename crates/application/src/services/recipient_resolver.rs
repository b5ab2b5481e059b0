//! Recipient resolution
//!
//! Turns free-form recipient input plus an optional fallback address into a
//! [`RecipientSet`].

use domain::{DomainError, RecipientSet};

/// Separators accepted between addresses in free-form input
const SEPARATORS: [char; 2] = [',', ';'];

/// Resolve the recipients of one dispatch
///
/// `raw_input` is split on any mix of commas and semicolons. The fallback
/// address (usually the requesting user) is appended last, so an address
/// given explicitly keeps its position.
///
/// # Errors
///
/// Returns [`DomainError::NoRecipients`] when neither input yields an address.
pub fn resolve(raw_input: &str, fallback: Option<&str>) -> Result<RecipientSet, DomainError> {
    let candidates = raw_input
        .split(|c: char| SEPARATORS.contains(&c))
        .chain(fallback);
    RecipientSet::from_candidates(candidates)
}
