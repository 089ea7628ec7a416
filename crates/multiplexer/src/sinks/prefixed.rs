//! PrefixedSink - fills leading columns with fixed values
//!
//! Useful when many producers share one output table and each tags its rows
//! with an identifier (run id, algorithm name, ...).

use contracts::{Layout, Row, RowSink, TableError, Value};

/// Wraps a sink whose first columns are always the same values
///
/// The wrapper's own layout is the inner layout minus the prefixed columns.
pub struct PrefixedSink<S> {
    name: String,
    layout: Layout,
    prefix: Vec<Value>,
    inner: S,
}

impl<S: RowSink> PrefixedSink<S> {
    /// Wrap `inner`, supplying `prefix` for its leading columns
    ///
    /// # Errors
    /// `TableError::Layout` if the prefix is longer than the inner layout.
    pub fn new(inner: S, prefix: Vec<Value>) -> Result<Self, TableError> {
        let layout = inner.layout().skip_columns(prefix.len())?;
        Ok(Self {
            name: format!("{}+prefix", inner.name()),
            layout,
            prefix,
            inner,
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RowSink> RowSink for PrefixedSink<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        self.layout.check_row(&self.name, row)?;
        let full: Row = self.prefix.iter().chain(row.iter()).cloned().collect();
        self.inner.write_row(&full)
    }

    fn flush(&mut self) -> Result<(), TableError> {
        self.inner.flush()
    }

    fn close(&mut self) -> Result<(), TableError> {
        self.inner.close()
    }
}
