//! Error types for the board

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors raised at the edges of the board: storage, configuration and parsing of
/// user-supplied values. Store mutations themselves never fail; they no-op.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Card not found
    #[error("card not found: {id}")]
    CardNotFound { id: String },

    /// Stage not found
    #[error("stage not found: {id}")]
    StageNotFound { id: String },

    /// Tag not found
    #[error("tag not found: {id}")]
    TagNotFound { id: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Snapshot envelope version this build cannot read
    #[error("unsupported snapshot version {found} (expected at most {supported})")]
    UnsupportedSnapshot { found: u32, supported: u32 },

    /// Another process holds the storage lock
    #[error("board storage is locked by another process: {}", path.display())]
    LockBusy { path: PathBuf },

    /// Configuration could not be loaded
    #[error("configuration error: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error came from a lookup of an unknown id
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CardNotFound { .. } | Self::StageNotFound { .. } | Self::TagNotFound { .. }
        )
    }
}

impl From<figment::Error> for BoardError {
    fn from(err: figment::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::CardNotFound {
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "card not found: abc123");
    }

    #[test]
    fn test_invalid_value() {
        let err = BoardError::invalid_value("priority", "unknown");
        assert_eq!(err.to_string(), "invalid value for priority: unknown");
    }

    #[test]
    fn test_not_found() {
        assert!(BoardError::StageNotFound { id: "x".into() }.is_not_found());
        assert!(!BoardError::config("bad").is_not_found());
    }
}
