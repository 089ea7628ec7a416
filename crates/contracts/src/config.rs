//! TableConfig - Config Loader output
//!
//! 描述一张输出表：列布局与输出路由。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{Layout, TableError};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的表输出配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TableConfig {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// Writer 名称 (用于日志)
    #[serde(default = "default_writer_name")]
    #[validate(length(min = 1, message = "writer name cannot be empty"))]
    pub name: String,

    /// 列布局
    #[validate(nested)]
    pub layout: LayoutConfig,

    /// 输出路由配置
    #[serde(default)]
    #[validate(nested)]
    pub sinks: Vec<SinkConfig>,
}

fn default_writer_name() -> String {
    "multiplexed".to_string()
}

/// 列布局配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LayoutConfig {
    /// 列名 (有序)
    #[validate(length(min = 1, message = "layout must declare at least one column"))]
    pub columns: Vec<String>,
}

impl LayoutConfig {
    /// Build the runtime layout
    pub fn to_layout(&self) -> Result<Layout, TableError> {
        Layout::new(self.columns.iter().cloned())
    }
}

/// Sink 配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Sink 名称
    #[validate(length(min = 1, message = "sink name cannot be empty"))]
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    /// Look up a parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 日志输出
    Log,
    /// CSV 文件
    Csv,
    /// TSV 文件
    Tsv,
    /// JSON Lines 文件
    JsonLines,
    /// 网络输出 (UDP)
    Network,
}

impl SinkType {
    /// Parameters that must be present for this sink type
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Self::Log => &[],
            Self::Csv | Self::Tsv | Self::JsonLines => &["path"],
            Self::Network => &["addr"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_type_serde_names() {
        let t: SinkType = serde_json::from_str(r#""json_lines""#).unwrap();
        assert_eq!(t, SinkType::JsonLines);
        assert_eq!(SinkType::Network.required_params(), ["addr"]);
    }

    #[test]
    fn test_validate_rejects_empty_columns() {
        let config = TableConfig {
            version: ConfigVersion::V1,
            name: "t".to_string(),
            layout: LayoutConfig { columns: vec![] },
            sinks: vec![],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_nested_sink_name() {
        let config = TableConfig {
            version: ConfigVersion::V1,
            name: "t".to_string(),
            layout: LayoutConfig {
                columns: vec!["a".to_string()],
            },
            sinks: vec![SinkConfig {
                name: String::new(),
                sink_type: SinkType::Log,
                params: HashMap::new(),
            }],
        };
        assert!(config.validate().is_err());
    }
}
