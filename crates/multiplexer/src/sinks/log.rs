//! LogSink - logs rows via tracing

use contracts::{Layout, Row, RowSink, TableError};
use tracing::{info, instrument};

/// Sink that logs each row for debugging
pub struct LogSink {
    name: String,
    layout: Layout,
    rows: u64,
    closed: bool,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            rows: 0,
            closed: false,
        }
    }

    fn render(&self, row: &Row) -> String {
        self.layout
            .columns()
            .iter()
            .zip(row.iter())
            .map(|(column, value)| format!("{column}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn ensure_open(&self) -> Result<(), TableError> {
        if self.closed {
            Err(TableError::sink_closed(&self.name))
        } else {
            Ok(())
        }
    }
}

impl RowSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        self.ensure_open()?;
        self.layout.check_row(&self.name, row)?;
        self.rows += 1;
        info!(sink = %self.name, row = self.rows, "{}", self.render(row));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TableError> {
        // Nothing to flush for log sink
        self.ensure_open()
    }

    #[instrument(name = "log_sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), TableError> {
        self.ensure_open()?;
        self.closed = true;
        info!(sink = %self.name, rows = self.rows, "LogSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::row;

    fn layout() -> Layout {
        Layout::new(["user", "score"]).unwrap()
    }

    #[test]
    fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log", layout());
        assert!(sink.write_row(&row!["alice", 0.5]).is_ok());
        assert_eq!(sink.render(&row!["bob", 2]), "user=bob score=2");
    }

    #[test]
    fn test_log_sink_rejects_wrong_arity() {
        let mut sink = LogSink::new("test_log", layout());
        assert!(matches!(
            sink.write_row(&row!["alice"]),
            Err(TableError::RowArity { .. })
        ));
    }

    #[test]
    fn test_log_sink_close_twice_fails() {
        let mut sink = LogSink::new("my_logger", layout());
        assert_eq!(sink.name(), "my_logger");
        sink.close().unwrap();
        assert!(matches!(sink.close(), Err(TableError::SinkClosed { .. })));
        assert!(sink.write_row(&row!["a", 1]).is_err());
    }
}
