//! Error types for the runlatch client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the Actions API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Primary rate limit still exhausted after the single retry
    #[error("Rate limit exhausted (retry after {retry_after_secs}s)")]
    RateLimited {
        /// Seconds until the quota resets
        retry_after_secs: u64,
    },

    /// Secondary rate limit (abuse detection) triggered; never retried
    #[error("Secondary rate limit triggered for {url}")]
    AbuseDetected {
        /// Request that tripped the limit
        url: String,
        /// Seconds the API asked us to back off, when it said
        retry_after_secs: Option<u64>,
    },
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error came from either rate limiter
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::AbuseDetected { .. })
    }
}
