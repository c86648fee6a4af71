//! Error types for the habit tracker Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving and updating a daily record.
///
/// Rejected requests never become an `Error`; the webhook maps them to responses directly.
#[derive(Error, Debug)]
pub enum Error {
    /// Due date could not be resolved
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// Configuration error (environment or remote database layout)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notion API answered with a non-success status
    #[error("Notion API error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a due date could not be turned into a calendar day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("unspecified date")]
    Unspecified,

    #[error("invalid date string: {0:?}")]
    InvalidString(String),

    #[error("unsupported date type: {0}")]
    UnsupportedType(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_wraps() {
        let err: Error = DateError::InvalidString("not-a-date".into()).into();
        assert_eq!(err.to_string(), "Date error: invalid date string: \"not-a-date\"");
    }
}
