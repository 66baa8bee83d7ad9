//! Error handling for the vibeflow CLI
//!
//! Errors carry the exit code the process should end with, plus the underlying
//! board error when there is one.

use std::error::Error;
use std::fmt;

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use vibeflow_board::BoardError;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// An error the user can fix by changing the arguments
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, EXIT_ERROR)
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        let mut current_source = self.source();
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {err}"));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<BoardError> for CliError {
    fn from(error: BoardError) -> Self {
        let message = match &error {
            BoardError::LockBusy { .. } => "another vibeflow command is using this board".to_string(),
            BoardError::Config { .. } => "could not load configuration".to_string(),
            other if other.is_not_found() => {
                format!("{other} (`vibeflow list --all` and `vibeflow tag list` show known ids)")
            }
            other => other.to_string(),
        };
        Self {
            message,
            exit_code: EXIT_ERROR,
            source: match error {
                BoardError::LockBusy { .. } | BoardError::Config { .. } => Some(Box::new(error)),
                _ => None,
            },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self {
            message: "failed to render output".to_string(),
            exit_code: EXIT_ERROR,
            source: Some(Box::new(error)),
        }
    }
}

/// Convert a CliResult to an exit code, printing the full error chain if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.full_chain());
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_chain_includes_source() {
        let err = CliError::from(BoardError::config("bad toml"));
        assert_eq!(err.exit_code, EXIT_ERROR);
        assert_eq!(
            err.full_chain(),
            "could not load configuration\n  Caused by: configuration error: bad toml"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = CliError::from(BoardError::StageNotFound { id: "done".into() });
        assert_eq!(
            err.full_chain(),
            "stage not found: done (`vibeflow list --all` and `vibeflow tag list` show known ids)"
        );
    }

    #[test]
    fn test_other_board_errors_keep_their_message() {
        let err = CliError::from(BoardError::invalid_value("priority", "Urgent"));
        assert_eq!(err.full_chain(), err.message);
        assert!(!err.message.contains("known ids"));
    }
}
