/// Structured error types for coachctl-core.
///
/// Uses `thiserror` so library consumers can match on what went wrong.
/// The binary (coachctl-tui) wraps these in `anyhow` at its boundaries.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for coachctl-core operations
#[derive(Error, Debug)]
pub enum CoachError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// The HTTP request could not be completed (connect, timeout, decode)
    #[error("Request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Requested entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Input rejected before reaching the service
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Fixture file could not be used
    #[error("Invalid fixture {path:?}: {reason}")]
    InvalidFixture { path: PathBuf, reason: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for coachctl-core operations
pub type Result<T> = std::result::Result<T, CoachError>;

impl CoachError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid fixture error
    pub fn invalid_fixture(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFixture {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoachError::not_found("batch", "b-42");
        assert_eq!(err.to_string(), "batch not found: b-42");

        let err = CoachError::api(403, "not a member of this coaching");
        assert_eq!(
            err.to_string(),
            "API error (403): not a member of this coaching"
        );

        let err = CoachError::invalid_input("name", "must not be empty");
        assert_eq!(err.to_string(), "Invalid name: must not be empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let coach_err: CoachError = io_err.into();

        assert!(matches!(coach_err, CoachError::Io { .. }));
    }

    #[test]
    fn test_fixture_error_mentions_path() {
        let err = CoachError::invalid_fixture("/tmp/batches.json", "unknown coaching");
        assert!(err.to_string().contains("/tmp/batches.json"));
        assert!(err.to_string().contains("unknown coaching"));
    }
}
