//! Wikipedia response types

/// A fetched page, whatever its HTTP status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status code of the final response
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
    /// URL after following redirects
    pub final_url: String,
}
