//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{SinkType, TableConfig};

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    name: String,
    column_count: usize,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    name: config.name.clone(),
                    column_count: config.layout.columns.len(),
                    sink_count: config.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &TableConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sinks.is_empty() {
        warnings.push("No sinks configured - rows will be discarded".to_string());
    }

    if config
        .sinks
        .iter()
        .all(|s| matches!(s.sink_type, SinkType::Log | SinkType::Network))
        && !config.sinks.is_empty()
    {
        warnings.push("No file sinks configured - output will not be persisted".to_string());
    }

    // Two file sinks pointing at one path would interleave output
    let mut paths = std::collections::HashSet::new();
    for sink in &config.sinks {
        if let Some(path) = sink.param("path") {
            if !paths.insert(path) {
                warnings.push(format!(
                    "Sink '{}' writes to '{}', which another sink also uses",
                    sink.name, path
                ));
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Name: {}", summary.name);
            println!("  Columns: {}", summary.column_count);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_warnings_for_shared_path() {
        let config = ConfigLoader::load_from_str(
            r#"
[layout]
columns = ["a"]

[[sinks]]
name = "one"
sink_type = "csv"
params = { path = "x.csv" }

[[sinks]]
name = "two"
sink_type = "tsv"
params = { path = "x.csv" }
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'two'"));
    }

    #[test]
    fn test_warning_for_no_sinks() {
        let config =
            ConfigLoader::load_from_str("[layout]\ncolumns = [\"a\"]\n", ConfigFormat::Toml)
                .unwrap();
        let warnings = collect_warnings(&config);
        assert_eq!(warnings, vec!["No sinks configured - rows will be discarded"]);
    }
}
