//! JsonLinesSink - one JSON object per row

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use contracts::{Layout, Row, RowSink, TableError};
use tracing::{debug, instrument};

use super::keyed::KeyedRow;

/// Sink that writes newline-delimited JSON objects keyed by column name
pub struct JsonLinesSink {
    name: String,
    layout: Layout,
    writer: Option<BufWriter<Box<dyn Write + Send>>>,
    rows: u64,
}

impl JsonLinesSink {
    /// Create a sink over an arbitrary writer
    pub fn new(name: impl Into<String>, layout: Layout, writer: impl Write + Send + 'static) -> Self {
        let boxed: Box<dyn Write + Send> = Box::new(writer);
        Self {
            name: name.into(),
            layout,
            writer: Some(BufWriter::new(boxed)),
            rows: 0,
        }
    }

    /// Create a file-backed sink, truncating any existing file
    pub fn create(
        name: impl Into<String>,
        layout: Layout,
        path: impl Into<PathBuf>,
    ) -> Result<Self, TableError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        Ok(Self::new(name, layout, file))
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        layout: Layout,
        params: &HashMap<String, String>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let path = params.get("path").ok_or_else(|| {
            TableError::config_validation(
                format!("sinks[{}].params.path", name),
                "missing 'path' parameter",
            )
        })?;
        Self::create(name, layout, path)
    }

    fn writer(&mut self) -> Result<&mut BufWriter<Box<dyn Write + Send>>, TableError> {
        self.writer
            .as_mut()
            .ok_or_else(|| TableError::sink_closed(&self.name))
    }
}

impl RowSink for JsonLinesSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        self.layout.check_row(&self.name, row)?;

        let mut line = serde_json::to_vec(&KeyedRow {
            layout: &self.layout,
            row,
        })
        .map_err(|e| TableError::sink_write(&self.name, e.to_string()))?;
        line.push(b'\n');

        let name = self.name.clone();
        self.writer()?
            .write_all(&line)
            .map_err(|e| TableError::sink_write(name, e.to_string()))?;
        self.rows += 1;
        Ok(())
    }

    #[instrument(name = "json_lines_sink_flush", skip(self), fields(sink = %self.name))]
    fn flush(&mut self) -> Result<(), TableError> {
        let name = self.name.clone();
        self.writer()?
            .flush()
            .map_err(|e| TableError::sink_flush(name, e.to_string()))
    }

    #[instrument(name = "json_lines_sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), TableError> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| TableError::sink_closed(&self.name))?;
        writer
            .flush()
            .map_err(|e| TableError::sink_close(&self.name, e.to_string()))?;
        debug!(sink = %self.name, rows = self.rows, "JsonLinesSink closed");
        Ok(())
    }
}
