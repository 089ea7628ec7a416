//! Sink implementations
//!
//! Contains LogSink, MemorySink, DelimitedSink, JsonLinesSink, NetworkSink,
//! and the PrefixedSink / MeteredSink wrappers.

mod delimited;
mod json_lines;
mod keyed;
mod log;
mod memory;
mod metered;
mod network;
mod prefixed;

pub use self::delimited::{DelimitedSink, DelimitedSinkConfig};
pub use self::json_lines::JsonLinesSink;
pub use self::log::LogSink;
pub use self::memory::{MemorySink, MemoryTable};
pub use self::metered::MeteredSink;
pub use self::network::{NetworkSink, NetworkSinkConfig};
pub use self::prefixed::PrefixedSink;
