//! Row pipeline: input reader -> multiplexed writer.

mod orchestrator;
mod reader;
mod stats;

pub use orchestrator::{Pipeline, PipelineConfig};
pub use reader::RowReader;
pub use stats::WriteStats;
