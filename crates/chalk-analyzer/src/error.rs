//! Analyzer error types.

use std::time::Duration;

use thiserror::Error;

/// Errors from a single analysis attempt.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API call failed with status: {status}. {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the body, or the status reason.
        message: String,
    },

    /// The API returned 429 Too Many Requests.
    #[error("rate limited — retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds the API asked us to wait.
        retry_after_secs: u64,
    },

    /// The attempt did not finish in time.
    #[error("analysis attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The response body was not JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// No API key configured.
    #[error("analyzer is not configured — set CHALK_ANALYZER__API_KEY")]
    NotConfigured,
}
