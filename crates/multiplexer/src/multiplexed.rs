//! MultiplexedWriter - fan-out of rows to an ordered set of sinks
//!
//! Writes and flushes stop at the first failing member. Close visits every
//! member and reports the first failure by member order.

use tracing::{debug, error, instrument, warn};

use contracts::{Layout, Row, RowSink, TableError};

use crate::error::WriterError;

const DEFAULT_NAME: &str = "multiplexed";

/// A `RowSink` that forwards every operation to each member sink in order
///
/// The member list is fixed at construction. The writer holds no row data
/// and does not track its own closed state; reuse after `close` behaves
/// however the members behave.
pub struct MultiplexedWriter {
    name: String,
    layout: Layout,
    sinks: Vec<Box<dyn RowSink>>,
}

impl MultiplexedWriter {
    /// Create a writer over `sinks`, writing in the given order
    ///
    /// Member layouts are not compared against `layout`; a mismatch is the
    /// caller's responsibility. See [`MultiplexedWriter::with_layout_check`].
    pub fn new(layout: Layout, sinks: Vec<Box<dyn RowSink>>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            layout,
            sinks,
        }
    }

    /// Create a writer, rejecting members whose layout differs from `layout`
    ///
    /// # Errors
    /// `WriterError::LayoutMismatch` naming the first offending member.
    pub fn with_layout_check(
        layout: Layout,
        sinks: Vec<Box<dyn RowSink>>,
    ) -> Result<Self, WriterError> {
        if let Some((index, sink)) = sinks
            .iter()
            .enumerate()
            .find(|(_, s)| s.layout() != &layout)
        {
            return Err(WriterError::LayoutMismatch {
                sink_name: sink.name().to_string(),
                index,
                expected: layout.columns().to_vec(),
                actual: sink.layout().columns().to_vec(),
            });
        }
        Ok(Self::new(layout, sinks))
    }

    /// Set the name reported in logs and by `RowSink::name`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of member sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Member sink names in write order
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    fn report_failure(&self, op: &str, index: usize, sink_name: &str, err: &TableError) {
        error!(
            writer = %self.name,
            index,
            sink = %sink_name,
            op,
            skipped = self.sinks.len() - index - 1,
            error = %err,
            "Member sink failed"
        );
    }
}

impl RowSink for MultiplexedWriter {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }

    #[instrument(
        name = "multiplexed_write_row",
        level = "trace",
        skip(self, row),
        fields(writer = %self.name, sinks = self.sinks.len())
    )]
    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        for index in 0..self.sinks.len() {
            if let Err(e) = self.sinks[index].write_row(row) {
                self.report_failure("write", index, self.sinks[index].name(), &e);
                return Err(e);
            }
        }
        Ok(())
    }

    #[instrument(
        name = "multiplexed_flush",
        skip(self),
        fields(writer = %self.name, sinks = self.sinks.len())
    )]
    fn flush(&mut self) -> Result<(), TableError> {
        for index in 0..self.sinks.len() {
            if let Err(e) = self.sinks[index].flush() {
                self.report_failure("flush", index, self.sinks[index].name(), &e);
                return Err(e);
            }
        }
        Ok(())
    }

    #[instrument(
        name = "multiplexed_close",
        skip(self),
        fields(writer = %self.name, sinks = self.sinks.len())
    )]
    fn close(&mut self) -> Result<(), TableError> {
        let mut failures: Vec<(usize, TableError)> = Vec::with_capacity(self.sinks.len());

        for (index, sink) in self.sinks.iter_mut().enumerate() {
            if let Err(e) = sink.close() {
                warn!(
                    writer = %self.name,
                    index,
                    sink = %sink.name(),
                    error = %e,
                    "Member sink failed to close"
                );
                failures.push((index, e));
            }
        }

        if failures.is_empty() {
            debug!(writer = %self.name, "All member sinks closed");
            return Ok(());
        }

        error!(
            writer = %self.name,
            failed = failures.len(),
            total = self.sinks.len(),
            first_index = failures[0].0,
            "Close failed for one or more member sinks"
        );

        let (_, first) = failures.swap_remove(0);
        Err(first)
    }
}
