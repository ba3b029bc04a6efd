pub mod loader;

pub use loader::ConfigLoader;

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 环境变量：容器名称
pub const ENV_NAME: &str = "INJECT_NAME";
/// 环境变量：是否记录每一步解析
pub const ENV_TRACE: &str = "INJECT_TRACE";
/// 环境变量：是否收集统计
pub const ENV_STATS: &str = "INJECT_STATS";

pub const DEFAULT_NAME: &str = "injector";

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// 出现在日志和错误信息中的名称
    pub name: String,
    /// 以 debug 级别记录注册与解析的每一步
    pub trace_resolution: bool,
    /// 是否维护解析统计
    pub collect_stats: bool,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            trace_resolution: false,
            collect_stats: true,
        }
    }
}

/// 配置文件中的可选字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialInjectorConfig {
    pub name: Option<String>,
    pub trace_resolution: Option<bool>,
    pub collect_stats: Option<bool>,
}

impl InjectorConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 解析 TOML 文本，不读取环境变量
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let partial: PartialInjectorConfig = toml::from_str(content)
            .map_err(|e| ConfigError::TomlParse("<string>".to_string(), e))?;
        Self::from_partial_and_env(Some(partial), &HashMap::new())
    }

    /// 文件配置与环境变量合并，环境变量优先
    pub fn from_partial_and_env(
        partial: Option<PartialInjectorConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        let defaults = Self::default();

        let name = env_map
            .get(ENV_NAME)
            .cloned()
            .or(partial.name)
            .unwrap_or(defaults.name);

        let trace_resolution = match env_map.get(ENV_TRACE) {
            Some(raw) => parse_bool(ENV_TRACE, raw)?,
            None => partial.trace_resolution.unwrap_or(defaults.trace_resolution),
        };

        let collect_stats = match env_map.get(ENV_STATS) {
            Some(raw) => parse_bool(ENV_STATS, raw)?,
            None => partial.collect_stats.unwrap_or(defaults.collect_stats),
        };

        Ok(Self {
            name,
            trace_resolution,
            collect_stats,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InjectorConfig::default();
        assert_eq!(config.name, DEFAULT_NAME);
        assert!(!config.trace_resolution);
        assert!(config.collect_stats);
    }

    #[test]
    fn test_from_toml_str_keeps_missing_fields_default() {
        let config = InjectorConfig::from_toml_str("name = \"request\"\ntrace_resolution = true\n").unwrap();
        assert_eq!(config.name, "request");
        assert!(config.trace_resolution);
        assert!(config.collect_stats);
    }

    #[test]
    fn test_env_overrides_file() {
        let partial = PartialInjectorConfig {
            name: Some("from-file".to_string()),
            trace_resolution: Some(false),
            collect_stats: Some(true),
        };
        let env: HashMap<String, String> = [
            (ENV_NAME.to_string(), "from-env".to_string()),
            (ENV_STATS.to_string(), "off".to_string()),
        ]
        .into_iter()
        .collect();

        let config = InjectorConfig::from_partial_and_env(Some(partial), &env).unwrap();
        assert_eq!(config.name, "from-env");
        assert!(!config.trace_resolution);
        assert!(!config.collect_stats);
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let env: HashMap<String, String> =
            [(ENV_TRACE.to_string(), "sometimes".to_string())].into_iter().collect();

        let err = InjectorConfig::from_partial_and_env(None, &env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_TRACE));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            InjectorConfig::from_toml_str("name = "),
            Err(ConfigError::TomlParse(..))
        ));
    }
}
