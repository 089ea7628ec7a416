//! DelimitedSink - CSV / TSV text output

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use contracts::{Layout, Row, RowSink, TableError, Value};
use tracing::{debug, error, instrument};

/// Configuration for DelimitedSink
#[derive(Debug, Clone)]
pub struct DelimitedSinkConfig {
    /// Output file
    pub path: PathBuf,
    /// Field separator
    pub delimiter: char,
    /// Write a header line of column names
    pub header: bool,
    /// Append to an existing file instead of truncating
    pub append: bool,
}

impl DelimitedSinkConfig {
    /// Create config from params map
    ///
    /// Recognised keys: `path` (required), `delimiter`, `header`, `append`.
    pub fn from_params(
        params: &HashMap<String, String>,
        default_delimiter: char,
    ) -> Result<Self, String> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .ok_or_else(|| "missing 'path' parameter".to_string())?;

        let delimiter = match params.get("delimiter").map(String::as_str) {
            None => default_delimiter,
            Some("\\t") | Some("tab") => '\t',
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '"' && c != '\n' && c != '\r' => c,
                    _ => return Err(format!("invalid delimiter '{}'", s)),
                }
            }
        };

        Ok(Self {
            path,
            delimiter,
            header: parse_flag(params, "header", true)?,
            append: parse_flag(params, "append", false)?,
        })
    }
}

fn parse_flag(params: &HashMap<String, String>, key: &str, default: bool) -> Result<bool, String> {
    match params.get(key) {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| format!("'{}' must be true or false, got '{}'", key, v)),
    }
}

/// Sink that writes delimiter-separated text, one line per row
pub struct DelimitedSink {
    name: String,
    layout: Layout,
    delimiter: char,
    writer: Option<BufWriter<Box<dyn Write + Send>>>,
    rows: u64,
}

impl DelimitedSink {
    /// Create a sink over an arbitrary writer, emitting the header immediately if requested
    pub fn new(
        name: impl Into<String>,
        layout: Layout,
        writer: impl Write + Send + 'static,
        delimiter: char,
        header: bool,
    ) -> Result<Self, TableError> {
        let boxed: Box<dyn Write + Send> = Box::new(writer);
        let mut sink = Self {
            name: name.into(),
            layout,
            delimiter,
            writer: Some(BufWriter::new(boxed)),
            rows: 0,
        };

        if header {
            let columns: Vec<Cow<'_, str>> = sink
                .layout
                .columns()
                .iter()
                .map(|c| Cow::Borrowed(c.as_str()))
                .collect();
            let line = sink.format_line(columns);
            sink.write_line(&line)?;
        }

        Ok(sink)
    }

    /// Create a file-backed sink
    pub fn create(
        name: impl Into<String>,
        layout: Layout,
        config: &DelimitedSinkConfig,
    ) -> Result<Self, TableError> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Skip the header when appending to a file that already has content
        let existing = config.append
            && fs::metadata(&config.path)
                .map(|m| m.len() > 0)
                .unwrap_or(false);

        let file = if config.append {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.path)?
        } else {
            File::create(&config.path)?
        };

        Self::new(name, layout, file, config.delimiter, config.header && !existing)
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        layout: Layout,
        params: &HashMap<String, String>,
        default_delimiter: char,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let config = DelimitedSinkConfig::from_params(params, default_delimiter)
            .map_err(|e| TableError::config_validation(format!("sinks[{}].params", name), e))?;
        Self::create(name, layout, &config)
    }

    fn escape<'a>(&self, field: Cow<'a, str>) -> Cow<'a, str> {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\n' || c == '\r');
        if needs_quotes {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            field
        }
    }

    fn format_line<'a>(&self, fields: impl IntoIterator<Item = Cow<'a, str>>) -> String {
        let mut line = String::new();
        for (idx, field) in fields.into_iter().enumerate() {
            if idx > 0 {
                line.push(self.delimiter);
            }
            line.push_str(&self.escape(field));
        }
        line.push('\n');
        line
    }

    fn format_row(&self, row: &Row) -> String {
        self.format_line(row.iter().map(|value| match value {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }))
    }

    fn write_line(&mut self, line: &str) -> Result<(), TableError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| TableError::sink_closed(&self.name))?;
        writer.write_all(line.as_bytes()).map_err(|e| {
            error!(sink = %self.name, error = %e, "Write failed");
            TableError::sink_write(&self.name, e.to_string())
        })
    }
}

impl RowSink for DelimitedSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        self.layout.check_row(&self.name, row)?;
        let line = self.format_row(row);
        self.write_line(&line)?;
        self.rows += 1;
        Ok(())
    }

    #[instrument(name = "delimited_sink_flush", skip(self), fields(sink = %self.name))]
    fn flush(&mut self) -> Result<(), TableError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| TableError::sink_closed(&self.name))?;
        writer
            .flush()
            .map_err(|e| TableError::sink_flush(&self.name, e.to_string()))
    }

    #[instrument(name = "delimited_sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), TableError> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| TableError::sink_closed(&self.name))?;
        writer
            .flush()
            .map_err(|e| TableError::sink_close(&self.name, e.to_string()))?;
        debug!(sink = %self.name, rows = self.rows, "DelimitedSink closed");
        Ok(())
    }
}
