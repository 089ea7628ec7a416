//! Pipeline orchestrator: pumps rows from a reader into a writer.

use std::io::BufRead;
use std::time::Instant;

use contracts::RowSink;
use tracing::{debug, error, info, instrument};

use crate::error::{CliError, Result};

use super::reader::RowReader;
use super::stats::WriteStats;

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Flush all sinks every N rows
    pub flush_every: Option<u64>,
    /// Stop after N rows
    pub max_rows: Option<u64>,
}

/// Drives one write run and always closes the writer at the end
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Write every input row, flush, then close the writer
    ///
    /// On a read or write failure the writer is still closed; a close error
    /// in that case is logged and the original failure is returned.
    #[instrument(name = "pipeline_run", skip_all, fields(writer = %writer.name()))]
    pub fn run<R: BufRead>(
        &self,
        writer: &mut dyn RowSink,
        mut reader: RowReader<R>,
    ) -> Result<WriteStats> {
        let started = Instant::now();
        let mut stats = WriteStats::default();

        let outcome = self.pump(writer, &mut reader, &mut stats);
        stats.blank_lines = reader.blank_lines();

        match outcome {
            Ok(()) => {
                writer.close()?;
                stats.duration = started.elapsed();
                info!(
                    rows = stats.rows_written,
                    flushes = stats.flushes,
                    "All sinks closed"
                );
                Ok(stats)
            }
            Err(e) => {
                if let Err(close_err) = writer.close() {
                    error!(error = %close_err, "Close after failed run also failed");
                }
                Err(e)
            }
        }
    }

    fn pump<R: BufRead>(
        &self,
        writer: &mut dyn RowSink,
        reader: &mut RowReader<R>,
        stats: &mut WriteStats,
    ) -> Result<()> {
        while let Some(row) = reader.next() {
            if self
                .config
                .max_rows
                .is_some_and(|max| stats.rows_written >= max)
            {
                debug!(max_rows = stats.rows_written, "Row limit reached");
                break;
            }

            let row = row?;
            let row_started = Instant::now();
            writer
                .write_row(&row)
                .map_err(|source| CliError::Write {
                    line: reader.line_no(),
                    source,
                })?;
            stats
                .row_latency_us
                .push(row_started.elapsed().as_secs_f64() * 1e6);
            stats.rows_written += 1;

            if self
                .config
                .flush_every
                .is_some_and(|n| stats.rows_written % n == 0)
            {
                writer.flush()?;
                stats.flushes += 1;
                debug!(rows = stats.rows_written, "Periodic flush");
            }
        }

        writer.flush()?;
        stats.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{row, Layout};
    use multiplexer::{MemorySink, MultiplexedWriter};
    use std::io::Cursor;

    fn setup() -> (MultiplexedWriter, multiplexer::MemoryTable, multiplexer::MemoryTable) {
        let layout = Layout::new(["user", "score"]).unwrap();
        let a = MemorySink::new("a", layout.clone());
        let b = MemorySink::new("b", layout.clone());
        let (ta, tb) = (a.table(), b.table());
        let writer = MultiplexedWriter::new(layout, vec![Box::new(a), Box::new(b)]);
        (writer, ta, tb)
    }

    fn reader(input: &str) -> RowReader<Cursor<Vec<u8>>> {
        let layout = Layout::new(["user", "score"]).unwrap();
        RowReader::new(Cursor::new(input.as_bytes().to_vec()), layout)
    }

    #[test]
    fn test_pipeline_writes_and_closes() {
        let (mut writer, ta, tb) = setup();
        let pipeline = Pipeline::new(PipelineConfig {
            flush_every: Some(2),
            max_rows: None,
        });

        let stats = pipeline
            .run(&mut writer, reader("[\"a\", 1]\n[\"b\", 2]\n\n[\"c\", 3]\n"))
            .unwrap();

        assert_eq!(stats.rows_written, 3);
        assert_eq!(stats.blank_lines, 1);
        // One periodic flush plus the final one
        assert_eq!(stats.flushes, 2);
        assert_eq!(ta.rows(), tb.rows());
        assert_eq!(ta.len(), 3);
        assert_eq!(ta.flush_count(), 2);
        assert!(ta.is_closed() && tb.is_closed());
    }

    #[test]
    fn test_pipeline_respects_max_rows() {
        let (mut writer, ta, _) = setup();
        let pipeline = Pipeline::new(PipelineConfig {
            flush_every: None,
            max_rows: Some(1),
        });

        let stats = pipeline
            .run(&mut writer, reader("[\"a\", 1]\n[\"b\", 2]\n"))
            .unwrap();
        assert_eq!(stats.rows_written, 1);
        assert_eq!(ta.rows(), vec![row!["a", 1]]);
    }

    #[test]
    fn test_pipeline_closes_on_write_failure() {
        let (mut writer, ta, tb) = setup();
        let pipeline = Pipeline::new(PipelineConfig::default());

        let err = pipeline
            .run(&mut writer, reader("[\"a\", 1]\n[\"too\", \"many\", 3]\n"))
            .unwrap_err();

        match err {
            CliError::Write { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ta.len(), 1);
        assert!(ta.is_closed() && tb.is_closed());
    }
}
