use std::{collections::HashMap, env, fs, path::PathBuf};

use super::{InjectorConfig, PartialInjectorConfig, ENV_NAME, ENV_STATS, ENV_TRACE};
use crate::errors::ConfigError;

/// 默认配置文件名（相对当前目录）
pub const CONFIG_FILE_NAME: &str = "inject.toml";

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader that reads `inject.toml` from the working directory
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Create a loader for an explicit file (for testing or embedding)
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Load configuration: file first, then environment overrides
    pub fn load(&self) -> Result<InjectorConfig, ConfigError> {
        let partial = self.load_partial_config()?;
        let env_map = self.collect_env_vars();
        InjectorConfig::from_partial_and_env(partial, &env_map)
    }

    fn config_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// A missing file is not an error; defaults apply
    fn load_partial_config(&self) -> Result<Option<PartialInjectorConfig>, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(None);
        }

        let display = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::FileRead(display.clone(), e))?;
        let partial: PartialInjectorConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display, e))?;
        Ok(Some(partial))
    }

    fn collect_env_vars(&self) -> HashMap<String, String> {
        [ENV_NAME, ENV_TRACE, ENV_STATS]
            .iter()
            .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
