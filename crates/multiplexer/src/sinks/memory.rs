//! MemorySink - collects rows in memory
//!
//! The sink hands out a `MemoryTable` handle so rows stay readable after the
//! sink itself has been moved into a writer.

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{Layout, Row, RowSink, TableError};
use tracing::debug;

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<Row>,
    flushes: u64,
    closed: bool,
}

/// Shared read handle onto a `MemorySink`'s contents
#[derive(Debug, Clone)]
pub struct MemoryTable {
    layout: Layout,
    state: Arc<Mutex<TableState>>,
}

impl MemoryTable {
    fn lock(&self) -> MutexGuard<'_, TableState> {
        // A poisoned lock still holds consistent row data.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Copy of every row written so far
    pub fn rows(&self) -> Vec<Row> {
        self.lock().rows.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flush_count(&self) -> u64 {
        self.lock().flushes
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

/// Sink that keeps every row in memory
pub struct MemorySink {
    name: String,
    table: MemoryTable,
}

impl MemorySink {
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            table: MemoryTable {
                layout,
                state: Arc::default(),
            },
        }
    }

    /// Handle for reading the collected rows
    pub fn table(&self) -> MemoryTable {
        self.table.clone()
    }

    fn open_state(&self) -> Result<MutexGuard<'_, TableState>, TableError> {
        let state = self.table.lock();
        if state.closed {
            return Err(TableError::sink_closed(&self.name));
        }
        Ok(state)
    }
}

impl RowSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &Layout {
        &self.table.layout
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        self.table.layout.check_row(&self.name, row)?;
        self.open_state()?.rows.push(row.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TableError> {
        self.open_state()?.flushes += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TableError> {
        let mut state = self.open_state()?;
        state.closed = true;
        debug!(sink = %self.name, rows = state.rows.len(), "MemorySink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::row;

    #[test]
    fn test_memory_sink_collects_rows() {
        let mut sink = MemorySink::new("mem", Layout::new(["a", "b"]).unwrap());
        let table = sink.table();

        sink.write_row(&row!["x", 1]).unwrap();
        sink.write_row(&row!["y", 2]).unwrap();
        sink.flush().unwrap();

        assert_eq!(table.rows(), vec![row!["x", 1], row!["y", 2]]);
        assert_eq!(table.flush_count(), 1);
        assert!(!table.is_closed());
    }

    #[test]
    fn test_memory_sink_survives_move() {
        let sink = MemorySink::new("mem", Layout::new(["a"]).unwrap());
        let table = sink.table();

        let mut boxed: Box<dyn RowSink> = Box::new(sink);
        boxed.write_row(&row![1]).unwrap();
        boxed.close().unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.is_closed());
    }

    #[test]
    fn test_memory_sink_closed_rejects() {
        let mut sink = MemorySink::new("mem", Layout::new(["a"]).unwrap());
        sink.close().unwrap();
        assert!(matches!(
            sink.write_row(&row![1]),
            Err(TableError::SinkClosed { .. })
        ));
        assert!(sink.close().is_err());
    }
}
