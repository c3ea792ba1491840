//! Error types for shelf-search

use thiserror::Error;

use crate::http::HttpError;

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by a search service or the Books API client
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Query rejected before it was sent
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Parse(err.to_string())
    }
}
