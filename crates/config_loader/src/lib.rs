//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON table configuration files
//! - Validate configuration legality
//! - Produce `TableConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("table.toml")).unwrap();
//! println!("Columns: {:?}", config.layout.columns);
//! ```

mod parser;
mod validator;

pub use contracts::TableConfig;
pub use parser::ConfigFormat;

use contracts::TableError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<TableConfig, TableError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<TableConfig, TableError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already-built configuration
    pub fn validate(config: &TableConfig) -> Result<(), TableError> {
        validator::validate(config)
    }

    /// Serialize TableConfig to TOML string
    pub fn to_toml(config: &TableConfig) -> Result<String, TableError> {
        toml::to_string_pretty(config)
            .map_err(|e| TableError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize TableConfig to JSON string
    pub fn to_json(config: &TableConfig) -> Result<String, TableError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| TableError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, TableError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            TableError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| TableError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, TableError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<TableConfig, TableError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}
