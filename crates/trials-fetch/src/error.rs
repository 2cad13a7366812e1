//! Error types for registry requests.

use thiserror::Error;

/// Errors that can occur while querying the registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The registry answered with a non-success status.
    #[error("registry API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Too many requests.
    #[error("registry rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited {
        /// Seconds until requests are accepted again.
        retry_after: u64,
    },

    /// Failed to parse JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The query could not be turned into a request.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl FetchError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => {
                "Could not connect to ClinicalTrials.gov. Please check your internet connection."
            }
            Self::Api { status, .. } if *status >= 500 => {
                "ClinicalTrials.gov is not available right now. Please try again later."
            }
            Self::Api { .. } => "ClinicalTrials.gov rejected the search request.",
            Self::RateLimited { .. } => "Too many requests. Please wait and try again.",
            Self::InvalidQuery(_) => "The search options are not valid.",
            Self::JsonParse(_) => "ClinicalTrials.gov returned an unreadable response.",
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::JsonParse(_) | Self::InvalidQuery(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = FetchError::Network("connection refused".to_string());
        assert!(err.user_message().contains("internet connection"));

        let err = FetchError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.user_message().contains("not available"));

        let err = FetchError::Api {
            status: 400,
            message: "bad filter".to_string(),
        };
        assert!(err.user_message().contains("rejected"));
    }

    #[test]
    fn test_retryable() {
        assert!(FetchError::Network("timeout".to_string()).is_retryable());
        assert!(FetchError::RateLimited { retry_after: 60 }.is_retryable());
        assert!(
            FetchError::Api {
                status: 502,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!FetchError::InvalidQuery("pageSize".to_string()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = FetchError::Api {
            status: 400,
            message: "bad filter".to_string(),
        };
        assert_eq!(err.to_string(), "registry API error (400): bad filter");
    }
}
