//! Error types for change feed retrieval.

use thiserror::Error;

/// Failure to obtain a batch of change records.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or transport-level error from reqwest.
    ///
    /// Includes connection failures, timeouts and body read errors.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success HTTP status.
    #[error("Change feed returned HTTP {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The (truncated) response body.
        message: String,
    },

    /// The body was JSON but not the expected shape, or the API reported an error.
    #[error("Malformed change feed response: {0}")]
    Parse(String),

    /// The body was not JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured endpoint could not be parsed.
    #[error("Invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Coarse classification used by callers deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request could not be completed (network, timeout, non-2xx).
    Transport,
    /// The response could not be understood.
    Parse,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transport(_) | FetchError::Status { .. } | FetchError::InvalidUrl(_) => {
                FetchErrorKind::Transport
            }
            FetchError::Parse(_) | FetchError::Json(_) => FetchErrorKind::Parse,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == FetchErrorKind::Transport
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == FetchErrorKind::Parse
    }
}

/// Convenience Result type alias for change feed operations.
pub type FetchResult<T> = Result<T, FetchError>;
