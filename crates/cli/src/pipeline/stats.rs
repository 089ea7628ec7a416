//! Write statistics.

use std::time::Duration;

use multiplexer::MetricsSnapshot;
use observability::RunningStats;

/// Statistics from a write run
#[derive(Debug, Clone, Default)]
pub struct WriteStats {
    /// Rows accepted by every sink
    pub rows_written: u64,

    /// Blank input lines skipped
    pub blank_lines: u64,

    /// Explicit flushes issued (including the final one)
    pub flushes: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// Per-row latency across all sinks, in microseconds
    pub row_latency_us: RunningStats,

    /// Per-sink counters, in write order
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

impl WriteStats {
    /// Rows per second throughput
    pub fn rows_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Write Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Rows written: {}", self.rows_written);
        println!("   ├─ Blank lines skipped: {}", self.blank_lines);
        println!("   ├─ Flushes: {}", self.flushes);
        println!("   └─ Rows/s: {:.2}", self.rows_per_sec());

        if self.row_latency_us.count() > 0 {
            println!("\n⏱  Row latency (µs)");
            println!("   ├─ Mean: {:.1}", self.row_latency_us.mean());
            println!("   ├─ Std dev: {:.1}", self.row_latency_us.std_dev());
            println!("   ├─ Min: {:.1}", self.row_latency_us.min());
            println!("   └─ Max: {:.1}", self.row_latency_us.max());
        }

        if !self.sinks.is_empty() {
            println!("\n📤 Sinks");
            for (i, (name, m)) in self.sinks.iter().enumerate() {
                let prefix = if i == self.sinks.len() - 1 {
                    "└─"
                } else {
                    "├─"
                };
                println!(
                    "   {} {}: {} rows, {} flushes, {} failures",
                    prefix, name, m.write_count, m.flush_count, m.failure_count
                );
            }
        }

        println!();
    }
}
