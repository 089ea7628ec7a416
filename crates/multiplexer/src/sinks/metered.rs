//! MeteredSink - counts operations of a wrapped sink

use std::sync::Arc;
use std::time::Instant;

use contracts::{Layout, Row, RowSink, TableError};
use observability::SinkOp;

use crate::metrics::SinkMetrics;

/// Wrapper that records per-sink counters without changing behaviour
pub struct MeteredSink<S> {
    inner: S,
    metrics: Arc<SinkMetrics>,
}

impl<S: RowSink> MeteredSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Shared counters, readable after the sink is moved into a writer
    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    fn record_failure(&self, op: SinkOp) {
        self.metrics.inc_failure_count();
        observability::record_sink_failure(self.inner.name(), op);
    }
}

impl<S: RowSink> RowSink for MeteredSink<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn layout(&self) -> &Layout {
        self.inner.layout()
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        let started = Instant::now();
        match self.inner.write_row(row) {
            Ok(()) => {
                self.metrics.inc_write_count();
                observability::record_row_written(self.inner.name());
                observability::record_write_latency_us(
                    self.inner.name(),
                    started.elapsed().as_secs_f64() * 1e6,
                );
                Ok(())
            }
            Err(e) => {
                self.record_failure(SinkOp::Write);
                Err(e)
            }
        }
    }

    fn flush(&mut self) -> Result<(), TableError> {
        match self.inner.flush() {
            Ok(()) => {
                self.metrics.inc_flush_count();
                observability::record_flush(self.inner.name());
                Ok(())
            }
            Err(e) => {
                self.record_failure(SinkOp::Flush);
                Err(e)
            }
        }
    }

    fn close(&mut self) -> Result<(), TableError> {
        self.metrics.inc_close_count();
        let result = self.inner.close();
        observability::record_sink_closed(self.inner.name(), result.is_ok());
        if result.is_err() {
            self.record_failure(SinkOp::Close);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsSnapshot;
    use crate::sinks::MemorySink;
    use contracts::row;

    #[test]
    fn test_metered_counts() {
        let mut sink = MeteredSink::new(MemorySink::new("mem", Layout::new(["a"]).unwrap()));
        let metrics = sink.metrics();

        sink.write_row(&row![1]).unwrap();
        sink.write_row(&row![2]).unwrap();
        assert!(sink.write_row(&row![1, 2]).is_err());
        sink.flush().unwrap();
        sink.close().unwrap();
        assert!(sink.close().is_err());

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                write_count: 2,
                failure_count: 2,
                flush_count: 1,
                close_count: 2,
            }
        );
    }

    #[test]
    fn test_metered_is_transparent() {
        let sink = MeteredSink::new(MemorySink::new("mem", Layout::new(["a", "b"]).unwrap()));
        assert_eq!(sink.name(), "mem");
        assert_eq!(sink.layout().column_count(), 2);
    }
}
