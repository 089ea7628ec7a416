//! `write` command implementation.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use tracing::info;

use contracts::{RowSink, TableConfig};

use crate::cli::WriteArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig, RowReader};

/// Execute the `write` command
pub fn run_write(args: &WriteArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        name = %config.name,
        columns = config.layout.columns.len(),
        sinks = config.sinks.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    let mut configured = multiplexer::create_writer(&config).context("Failed to create sinks")?;

    let input = open_input(args)?;
    let reader = RowReader::new(input, configured.writer.layout().clone());

    let pipeline = Pipeline::new(PipelineConfig {
        flush_every: (args.flush_every > 0).then_some(args.flush_every),
        max_rows: (args.max_rows > 0).then_some(args.max_rows),
    });

    let result = pipeline.run(&mut configured.writer, reader);
    let sink_metrics = configured.metrics();

    let mut stats = result.context("Write run failed")?;
    stats.sinks = sink_metrics;

    info!(
        rows = stats.rows_written,
        duration_secs = stats.duration.as_secs_f64(),
        rows_per_sec = format!("{:.2}", stats.rows_per_sec()),
        "Write completed successfully"
    );
    stats.print_summary();

    Ok(())
}

fn open_input(args: &WriteArgs) -> Result<Box<dyn BufRead>> {
    if args.input.as_os_str() == "-" {
        info!("Reading rows from stdin");
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open input {}", args.input.display()))?;
    info!(input = %args.input.display(), "Reading rows from file");
    Ok(Box::new(BufReader::new(file)))
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &TableConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Table: {}", config.name);
    println!(
        "Columns ({}): {}",
        config.layout.columns.len(),
        config.layout.columns.join(", ")
    );

    if config.sinks.is_empty() {
        println!("\nSinks: none (rows will be discarded)");
    } else {
        println!("\nSinks ({}):", config.sinks.len());
        for sink in &config.sinks {
            match sink.param("path").or_else(|| sink.param("addr")) {
                Some(target) => {
                    println!("  - {} ({:?}) -> {}", sink.name, sink.sink_type, target)
                }
                None => println!("  - {} ({:?})", sink.name, sink.sink_type),
            }
        }
    }

    println!();
}
