//! Multiplexer error types

use thiserror::Error;

/// Multiplexer-specific errors
#[derive(Debug, Error)]
pub enum WriterError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Member sink declares a different layout than the writer
    #[error("sink '{sink_name}' at position {index} has layout {actual:?}, writer expects {expected:?}")]
    LayoutMismatch {
        sink_name: String,
        index: usize,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Sink error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::TableError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WriterError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
