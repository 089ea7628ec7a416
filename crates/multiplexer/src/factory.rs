//! Writer factory - builds a MultiplexedWriter from configuration

use std::sync::Arc;

use tracing::{info, instrument, warn};

use contracts::{Layout, RowSink, SinkConfig, SinkType, TableConfig};

use crate::error::WriterError;
use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::multiplexed::MultiplexedWriter;
use crate::sinks::{DelimitedSink, JsonLinesSink, LogSink, MeteredSink, NetworkSink};

/// A configured writer together with the counters of its member sinks
pub struct ConfiguredWriter {
    /// The multiplexed writer, ready for rows
    pub writer: MultiplexedWriter,
    metrics: Vec<(String, Arc<SinkMetrics>)>,
}

impl ConfiguredWriter {
    /// Get metrics for all sinks, in write order
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.metrics
            .iter()
            .map(|(name, m)| (name.clone(), m.snapshot()))
            .collect()
    }

    pub fn into_writer(self) -> MultiplexedWriter {
        self.writer
    }
}

/// Builder for creating a configured writer
pub struct WriterBuilder {
    name: String,
    layout: Layout,
    sinks: Vec<SinkConfig>,
}

impl WriterBuilder {
    /// Create a builder from a loaded table configuration
    pub fn from_config(config: &TableConfig) -> Result<Self, WriterError> {
        Ok(Self {
            name: config.name.clone(),
            layout: config.layout.to_layout()?,
            sinks: config.sinks.clone(),
        })
    }

    /// Create a builder for an explicit layout with no sinks yet
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            sinks: Vec::new(),
        }
    }

    /// Append a sink configuration
    pub fn sink(mut self, config: SinkConfig) -> Self {
        self.sinks.push(config);
        self
    }

    /// Create every sink in order and assemble the writer
    ///
    /// If any sink fails to build, the sinks already created are closed
    /// before the error is returned.
    #[instrument(
        name = "writer_builder_build",
        skip(self),
        fields(writer = %self.name, sink_count = self.sinks.len())
    )]
    pub fn build(self) -> Result<ConfiguredWriter, WriterError> {
        let mut members: Vec<Box<dyn RowSink>> = Vec::with_capacity(self.sinks.len());
        let mut metrics = Vec::with_capacity(self.sinks.len());

        for sink_config in &self.sinks {
            match create_sink(sink_config, &self.layout) {
                Ok(sink) => {
                    let metered = MeteredSink::new(sink);
                    metrics.push((sink_config.name.clone(), metered.metrics()));
                    members.push(Box::new(metered));
                }
                Err(e) => {
                    release(members);
                    return Err(e);
                }
            }
        }

        info!(
            writer = %self.name,
            columns = self.layout.column_count(),
            sinks = members.len(),
            "Writer ready"
        );

        Ok(ConfiguredWriter {
            writer: MultiplexedWriter::new(self.layout, members).named(self.name),
            metrics,
        })
    }
}

fn release(members: Vec<Box<dyn RowSink>>) {
    for mut sink in members {
        if let Err(e) = sink.close() {
            warn!(sink = %sink.name(), error = %e, "Failed to close sink after aborted build");
        }
    }
}

/// Create a single sink from configuration
#[instrument(
    name = "writer_create_sink",
    skip(config, layout),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink(config: &SinkConfig, layout: &Layout) -> Result<Box<dyn RowSink>, WriterError> {
    let name = config.name.as_str();
    let layout = layout.clone();
    let wrap = |e: contracts::TableError| WriterError::sink_creation(name, e.to_string());

    let sink: Box<dyn RowSink> = match config.sink_type {
        SinkType::Log => Box::new(LogSink::new(name, layout)),
        SinkType::Csv => Box::new(
            DelimitedSink::from_params(name, layout, &config.params, ',').map_err(wrap)?,
        ),
        SinkType::Tsv => Box::new(
            DelimitedSink::from_params(name, layout, &config.params, '\t').map_err(wrap)?,
        ),
        SinkType::JsonLines => {
            Box::new(JsonLinesSink::from_params(name, layout, &config.params).map_err(wrap)?)
        }
        SinkType::Network => {
            Box::new(NetworkSink::from_params(name, layout, &config.params).map_err(wrap)?)
        }
    };
    Ok(sink)
}

/// Convenience function to create a writer from a table configuration
pub fn create_writer(config: &TableConfig) -> Result<ConfiguredWriter, WriterError> {
    WriterBuilder::from_config(config)?.build()
}
