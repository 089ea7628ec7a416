//! Layered error definitions
//!
//! Categorized by source: config / layout / sink

use thiserror::Error;

/// Unified error type
///
/// Every fallible `RowSink` operation reports through this type. Callers that
/// only care about propagation can treat it as a single I/O-class failure.
#[derive(Debug, Error)]
pub enum TableError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Layout Errors =====
    /// Invalid layout definition
    #[error("invalid layout: {message}")]
    Layout { message: String },

    /// Row does not match the sink's layout
    #[error("sink '{sink_name}' expected {expected} values per row, got {actual}")]
    RowArity {
        sink_name: String,
        expected: usize,
        actual: usize,
    },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    /// Sink flush error
    #[error("sink '{sink_name}' flush error: {message}")]
    SinkFlush { sink_name: String, message: String },

    /// Sink close error
    #[error("sink '{sink_name}' close error: {message}")]
    SinkClose { sink_name: String, message: String },

    /// Operation attempted on a closed sink
    #[error("sink '{sink_name}' is closed")]
    SinkClosed { sink_name: String },

    /// Sink connection error
    #[error("sink '{sink_name}' connection error: {message}")]
    SinkConnection { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl TableError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create layout error
    pub fn layout(message: impl Into<String>) -> Self {
        Self::Layout {
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink flush error
    pub fn sink_flush(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkFlush {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink close error
    pub fn sink_close(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkClose {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create closed-sink error
    pub fn sink_closed(sink_name: impl Into<String>) -> Self {
        Self::SinkClosed {
            sink_name: sink_name.into(),
        }
    }

    /// Name of the sink this error is attributed to, if any
    pub fn sink_name(&self) -> Option<&str> {
        match self {
            Self::RowArity { sink_name, .. }
            | Self::SinkWrite { sink_name, .. }
            | Self::SinkFlush { sink_name, .. }
            | Self::SinkClose { sink_name, .. }
            | Self::SinkClosed { sink_name }
            | Self::SinkConnection { sink_name, .. } => Some(sink_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_sink() {
        let err = TableError::sink_write("csv_out", "disk full");
        assert_eq!(err.to_string(), "sink 'csv_out' write error: disk full");
        assert_eq!(err.sink_name(), Some("csv_out"));
    }

    #[test]
    fn test_io_error_has_no_sink() {
        let err: TableError = std::io::Error::other("boom").into();
        assert!(matches!(err, TableError::Io(_)));
        assert_eq!(err.sink_name(), None);
    }
}
