//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::TableConfig;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    name: String,
    columns: Vec<String>,
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&config, args);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &TableConfig, args: &InfoArgs) -> ConfigInfo {
    let sinks = config
        .sinks
        .iter()
        .map(|s| SinkInfo {
            name: s.name.clone(),
            sink_type: format!("{:?}", s.sink_type),
            params: if args.sinks {
                s.params
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            } else {
                BTreeMap::new()
            },
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", config.version),
        name: config.name.clone(),
        columns: config.layout.columns.clone(),
        sinks,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  tablemux Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📋 Table");
    println!("   ├─ Version: {}", info.version);
    println!("   └─ Name: {}", info.name);

    println!("\n🧱 Columns ({})", info.columns.len());
    for (i, column) in info.columns.iter().enumerate() {
        let prefix = if i == info.columns.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!("   {} [{}] {}", prefix, i, column);
    }

    if info.sinks.is_empty() {
        println!("\n📤 Sinks: none");
    } else {
        println!("\n📤 Sinks ({}, written in this order)", info.sinks.len());
        for (i, sink) in info.sinks.iter().enumerate() {
            let is_last = i == info.sinks.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let child_prefix = if is_last { "   " } else { "│  " };
            println!("   {} {} ({})", prefix, sink.name, sink.sink_type);
            for (key, value) in &sink.params {
                println!("   {}    {} = {}", child_prefix, key, value);
            }
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::{ConfigFormat, ConfigLoader};
    use std::path::PathBuf;

    #[test]
    fn test_build_config_info_hides_params_by_default() {
        let config = ConfigLoader::load_from_str(
            r#"
name = "t"
[layout]
columns = ["a", "b"]
[[sinks]]
name = "out"
sink_type = "json_lines"
params = { path = "o.jsonl" }
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let mut args = InfoArgs {
            config: PathBuf::from("t.toml"),
            json: true,
            sinks: false,
        };
        let info = build_config_info(&config, &args);
        assert_eq!(info.columns, vec!["a", "b"]);
        assert_eq!(info.sinks[0].sink_type, "JsonLines");
        assert!(info.sinks[0].params.is_empty());

        args.sinks = true;
        let info = build_config_info(&config, &args);
        assert_eq!(info.sinks[0].params.get("path").map(String::as_str), Some("o.jsonl"));
    }
}
