//! Typed errors for review extraction.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the orchestrator can
//! tell a fetch failure from a page-shape problem from a single bad card.

use thiserror::Error;

/// Any error surfaced by this library.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Card(#[from] CardError),
}

/// Retrieving a listing page failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request did not complete within the configured timeout
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Connection, TLS or body read failure
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Http { source, .. } => source.is_connect() || source.is_request(),
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::Client(_) => false,
        }
    }
}

/// The page did not have the expected top-level shape.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Embedded data marker was found but its JSON was invalid
    #[error("embedded review data is not valid JSON: {0}")]
    EmbeddedJson(#[from] serde_json::Error),

    /// Embedded JSON parsed but the review list was not at the expected path
    #[error("embedded review data has no list at {path}")]
    MissingPath { path: &'static str },
}

/// A single card (or embedded review entry) could not become a review.
#[derive(Debug, Error)]
pub enum CardError {
    /// Every rule for every field missed
    #[error("card {index} has no recognizable review content")]
    NoContent { index: usize },

    /// Embedded entry had no identifier to qualify
    #[error("review entry {index} has no id")]
    MissingId { index: usize },

    /// Embedded entry was not a JSON object
    #[error("review entry {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for page-level parsing.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
