//! Error types for nowshowing.
//!
//! Most failures inside the scraping core degrade to "less data" and never
//! reach the caller. The variants below are what the fallible inner
//! operations return before that degradation happens.

/// Error type for fetch, extraction, and persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure (connect, timeout, body read).
    #[error("transport failed for {url}: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying error text.
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status} for {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// A single candidate element could not be walked.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Configuration values that cannot drive a crawl.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A crawl produced no movies, so there is nothing worth saving.
    #[error("no movies were crawled")]
    NoMovies,

    /// Filesystem failure (debug dump, JSON and CSV stores).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// CSV read or write failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Result type alias for nowshowing operations.
pub type Result<T> = std::result::Result<T, Error>;
