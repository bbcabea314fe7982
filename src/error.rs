//! Error types for dotenv-ts.
//!
//! Every failure the driver can hit maps to one variant here. `main` turns a
//! `GenError` into a colored status line and a non-zero exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    /// Conflicting or invalid flags. Raised before any side effect.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The user declined to overwrite an existing output file.
    #[error("Refusing to overwrite {path}")]
    Declined { path: PathBuf },

    /// The package manager exited unsuccessfully or could not be spawned.
    #[error("Command {command} failed")]
    Install { command: String },

    /// The env file does not exist.
    #[error("Couldn't find {path} file")]
    MissingInput { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The terminal prompt failed (not a cancellation).
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Watch error: {0}")]
    Watch(String),

    /// The settings file is missing or malformed.
    #[error("Failed to load settings from {path}: {message}")]
    Settings { path: PathBuf, message: String },
}

impl GenError {
    pub fn settings(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Settings {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether the watch loop can report this error and keep running.
    pub fn is_recoverable_in_watch(&self) -> bool {
        matches!(
            self,
            GenError::MissingInput { .. } | GenError::Read { .. } | GenError::Write { .. }
        )
    }
}

impl From<notify::Error> for GenError {
    fn from(e: notify::Error) -> Self {
        GenError::Watch(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_error_carries_command() {
        let err = GenError::Install {
            command: "npm install dotenv".to_string(),
        };
        assert_eq!(err.to_string(), "Command npm install dotenv failed");
    }

    #[test]
    fn test_recoverable_in_watch() {
        let missing = GenError::MissingInput {
            path: PathBuf::from(".env"),
        };
        assert!(missing.is_recoverable_in_watch());

        let config = GenError::Configuration("bad".to_string());
        assert!(!config.is_recoverable_in_watch());
    }
}
