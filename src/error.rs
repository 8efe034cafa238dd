//! Error types for the File Search adapter.

use thiserror::Error;

/// Errors surfaced by the File Search client and tool layer.
///
/// Nothing is retried and nothing is swallowed: every failure aborts the
/// current call and reaches the immediate caller. Partial results are never
/// returned alongside an error.
#[derive(Debug, Error)]
pub enum FileSearchError {
    /// The provider returned a non-success HTTP status. The message embeds
    /// the numeric status and the raw response body text.
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Raw response body text
        message: String,
        /// Additional error details, when the body parsed as JSON
        details: Option<serde_json::Value>,
    },

    /// The deadline elapsed before the request completed. Distinct from
    /// [`FileSearchError::HttpError`] so callers can tell a slow provider
    /// apart from a connectivity failure.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// Network-level failure (connect, TLS, read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Caller-supplied input violates a precondition. The message names the
    /// offending field.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The response body could not be parsed as JSON, or a JSON payload did
    /// not match the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No usable credential could be resolved for the provider.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl FileSearchError {
    /// Create an API error from a status code and raw body text. If the body
    /// is itself JSON, it is carried in `details` as well.
    pub fn api_error(code: u16, body: impl Into<String>) -> Self {
        let message = body.into();
        let details = serde_json::from_str(&message).ok();
        Self::ApiError {
            code,
            message,
            details,
        }
    }

    /// HTTP status code, if this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this error was caused by an elapsed deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutError(_))
    }
}
