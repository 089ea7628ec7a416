//! RowSink trait - tabular output interface
//!
//! Defines the abstract interface for anything that accepts rows.

use crate::{Layout, Row, TableError, Value};

/// Tabular output trait
///
/// All sink implementations, including the multiplexed writer, implement
/// this trait. A sink is bound to exactly one `Layout` for its lifetime.
/// After `close` the sink is terminal; whether further calls fail is up to
/// the implementation.
pub trait RowSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Column layout rows must match
    fn layout(&self) -> &Layout;

    /// Write one row
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write_row(&mut self, row: &Row) -> Result<(), TableError>;

    /// Write one row given as loose values
    fn write_values(&mut self, values: Vec<Value>) -> Result<(), TableError> {
        self.write_row(&Row::new(values))
    }

    /// Flush buffered output (if any)
    fn flush(&mut self) -> Result<(), TableError>;

    /// Close sink and release its resources
    fn close(&mut self) -> Result<(), TableError>;
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn layout(&self) -> &Layout {
        (**self).layout()
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        (**self).write_row(row)
    }

    fn write_values(&mut self, values: Vec<Value>) -> Result<(), TableError> {
        (**self).write_values(values)
    }

    fn flush(&mut self) -> Result<(), TableError> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<(), TableError> {
        (**self).close()
    }
}
