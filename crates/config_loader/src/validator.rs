//! 配置校验模块
//!
//! 校验规则：
//! - 字段级规则 (derive `Validate`)：列非空、sink 名称非空
//! - 列名唯一
//! - sink 名称唯一
//! - sink 必填参数齐全

use std::collections::HashSet;

use ::validator::Validate;
use contracts::{TableConfig, TableError};

/// 校验 TableConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &TableConfig) -> Result<(), TableError> {
    validate_fields(config)?;
    validate_columns(config)?;
    validate_sink_names(config)?;
    validate_sink_params(config)?;
    Ok(())
}

/// 字段级校验
fn validate_fields(config: &TableConfig) -> Result<(), TableError> {
    config
        .validate()
        .map_err(|e| TableError::config_validation("table", e.to_string().trim().to_string()))
}

/// 校验列名 (非空、唯一)
fn validate_columns(config: &TableConfig) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for (idx, column) in config.layout.columns.iter().enumerate() {
        if column.is_empty() {
            return Err(TableError::config_validation(
                format!("layout.columns[{}]", idx),
                "column name cannot be empty",
            ));
        }
        if !seen.insert(column) {
            return Err(TableError::config_validation(
                format!("layout.columns[{}]", idx),
                format!("duplicate column '{}'", column),
            ));
        }
    }
    Ok(())
}

/// 校验 sink 名称唯一性
fn validate_sink_names(config: &TableConfig) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for sink in &config.sinks {
        if !seen.insert(&sink.name) {
            return Err(TableError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// 校验 sink 必填参数
fn validate_sink_params(config: &TableConfig) -> Result<(), TableError> {
    for sink in &config.sinks {
        for key in sink.sink_type.required_params() {
            match sink.param(key) {
                Some(value) if !value.trim().is_empty() => {}
                _ => {
                    return Err(TableError::config_validation(
                        format!("sinks[{}].params.{}", sink.name, key),
                        format!("{:?} sink requires '{}'", sink.sink_type, key),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ConfigVersion, LayoutConfig, SinkConfig, SinkType};
    use std::collections::HashMap;

    fn create_valid_config() -> TableConfig {
        let mut params = HashMap::new();
        params.insert("path".to_string(), "out.csv".to_string());

        TableConfig {
            version: ConfigVersion::V1,
            name: "results".to_string(),
            layout: LayoutConfig {
                columns: vec!["user".to_string(), "score".to_string()],
            },
            sinks: vec![
                SinkConfig {
                    name: "log".to_string(),
                    sink_type: SinkType::Log,
                    params: HashMap::new(),
                },
                SinkConfig {
                    name: "csv".to_string(),
                    sink_type: SinkType::Csv,
                    params,
                },
            ],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_valid_config()).is_ok());
    }

    #[test]
    fn test_empty_sinks_is_valid() {
        let mut config = create_valid_config();
        config.sinks.clear();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_columns() {
        let mut config = create_valid_config();
        config.layout.columns.clear();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, TableError::ConfigValidation { .. }));
    }

    #[test]
    fn test_duplicate_column() {
        let mut config = create_valid_config();
        config.layout.columns.push("user".to_string());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut config = create_valid_config();
        config.sinks[1].name = "log".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate sink name"));
    }

    #[test]
    fn test_missing_required_param() {
        let mut config = create_valid_config();
        config.sinks[1].params.clear();
        let err = validate(&config).unwrap_err();
        match err {
            TableError::ConfigValidation { field, .. } => {
                assert_eq!(field, "sinks[csv].params.path");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_network_requires_addr() {
        let mut config = create_valid_config();
        config.sinks.push(SinkConfig {
            name: "udp".to_string(),
            sink_type: SinkType::Network,
            params: HashMap::new(),
        });
        assert!(validate(&config).is_err());
    }
}
