//! Ordered, de-duplicated delivery addresses for one dispatch

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Recipients of a single report delivery
///
/// Always non-empty. Addresses keep the spelling they were given with;
/// duplicates are detected case-insensitively and the first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct RecipientSet {
    addresses: Vec<String>,
}

impl RecipientSet {
    /// Build a set from candidate addresses in order
    ///
    /// Candidates are trimmed, blank ones are skipped and case-insensitive
    /// duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NoRecipients`] if nothing survives.
    pub fn from_candidates<I, S>(candidates: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut addresses: Vec<String> = Vec::new();
        for candidate in candidates {
            let candidate = candidate.as_ref().trim();
            if candidate.is_empty() || contains_ignore_case(&addresses, candidate) {
                continue;
            }
            addresses.push(candidate.to_string());
        }

        if addresses.is_empty() {
            return Err(DomainError::NoRecipients);
        }
        Ok(Self { addresses })
    }

    /// Check membership ignoring ASCII and Unicode case
    pub fn contains(&self, address: &str) -> bool {
        contains_ignore_case(&self.addresses, address.trim())
    }

    /// Number of recipients (at least one)
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Iterate over the addresses in delivery order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }

    /// Borrow the addresses as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.addresses
    }
}

fn contains_ignore_case(addresses: &[String], candidate: &str) -> bool {
    let needle = candidate.to_lowercase();
    addresses.iter().any(|a| a.to_lowercase() == needle)
}

impl fmt::Display for RecipientSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addresses.join(", "))
    }
}

impl TryFrom<Vec<String>> for RecipientSet {
    type Error = DomainError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_candidates(value)
    }
}

impl From<RecipientSet> for Vec<String> {
    fn from(set: RecipientSet) -> Self {
        set.addresses
    }
}

impl<'a> IntoIterator for &'a RecipientSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}
