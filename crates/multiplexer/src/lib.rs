//! # Multiplexer
//!
//! 表格输出分发模块。
//!
//! 负责：
//! - 将每一行按顺序写入多个 sinks (`MultiplexedWriter`)
//! - 写入/刷新遇错即停，关闭时尽力关闭全部 sink 并报告首个错误
//! - 根据配置构建 sinks (`create_writer`)

pub mod error;
pub mod factory;
pub mod metrics;
pub mod multiplexed;
pub mod sinks;

pub use contracts::{Layout, Row, RowSink, TableError, Value};
pub use error::WriterError;
pub use factory::{create_writer, ConfiguredWriter, WriterBuilder};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use multiplexed::MultiplexedWriter;
pub use sinks::{
    DelimitedSink, JsonLinesSink, LogSink, MemorySink, MemoryTable, MeteredSink, NetworkSink,
    PrefixedSink,
};
