//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tablemux - write one stream of rows to many tabular outputs at once
#[derive(Parser, Debug)]
#[command(
    name = "tablemux",
    author,
    version,
    about = "Multiplexed tabular output",
    long_about = "Reads rows as JSON lines and writes each one, in order, to every sink \n\
                  declared in a table configuration (log, CSV, TSV, JSON lines, UDP)."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TABLEMUX_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TABLEMUX_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write rows to every configured sink
    Write(WriteArgs),

    /// Validate configuration file without writing
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `write` command
#[derive(Parser, Debug, Clone)]
pub struct WriteArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "table.toml", env = "TABLEMUX_CONFIG")]
    pub config: PathBuf,

    /// Input file of JSON lines ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Flush all sinks every N rows (0 = only at the end)
    #[arg(long, default_value = "0", env = "TABLEMUX_FLUSH_EVERY")]
    pub flush_every: u64,

    /// Stop after N rows (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_rows: u64,

    /// Validate configuration and exit without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TABLEMUX_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "table.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "table.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show sink parameters
    #[arg(long)]
    pub sinks: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write_args() {
        let cli = Cli::parse_from([
            "tablemux",
            "-v",
            "write",
            "-c",
            "t.toml",
            "-i",
            "rows.jsonl",
            "--flush-every",
            "10",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Write(args) => {
                assert_eq!(args.config, PathBuf::from("t.toml"));
                assert_eq!(args.input, PathBuf::from("rows.jsonl"));
                assert_eq!(args.flush_every, 10);
                assert_eq!(args.max_rows, 0);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tablemux", "-q", "-v", "validate"]).is_err());
    }
}
