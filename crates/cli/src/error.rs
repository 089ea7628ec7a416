//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Input line could not be turned into a row
    #[error("Invalid input at line {line}: {message}")]
    InputParse { line: u64, message: String },

    /// Row rejected by the writer
    #[error("Write failed at input line {line}: {source}")]
    Write {
        line: u64,
        #[source]
        source: contracts::TableError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sink error outside of a specific row
    #[error(transparent)]
    Table(#[from] contracts::TableError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn input_parse(line: u64, message: impl Into<String>) -> Self {
        Self::InputParse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
