//! Fetch error types.

use thiserror::Error;

/// Error type for fetch operations.
///
/// Retryable failures (HTTP 429/5xx, connection errors, timeouts) never
/// appear here directly: the client retries them and reports
/// [`FetchError::Exhausted`] once it gives up.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A required setting is missing or invalid. No request was made.
    #[error("configuration error: {0}")]
    Config(String),

    /// Non-retryable HTTP status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code.
        status: u16,
        /// Request URL without query string.
        url: String,
    },

    /// The game identifier did not resolve on any host.
    #[error("game '{identifier}' not found on any host{}", last_error_suffix(.last_error))]
    NotFound {
        /// The slug that was looked up.
        identifier: String,
        /// Last error seen while trying hosts, if any host failed outright.
        last_error: Option<String>,
    },

    /// Every attempt failed with a retryable error.
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Description of the final failure.
        last_error: String,
    },

    /// Every configured host failed.
    #[error("count unavailable from all hosts: {last_error}")]
    AllHostsFailed {
        /// Description of the final failure.
        last_error: String,
    },

    /// The response body was not the JSON we expected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be built or a request could not be formed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shutdown was requested while waiting to retry.
    #[error("cancelled by shutdown")]
    Cancelled,
}

impl FetchError {
    /// Returns true for a fatal HTTP 404.
    pub fn is_not_found_status(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }

    /// Returns true if the error is caused by configuration, not the remote side.
    pub fn is_config(&self) -> bool {
        matches!(self, FetchError::Config(_))
    }
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(" (last error: {e})"))
        .unwrap_or_default()
}
