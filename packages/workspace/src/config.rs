use std::path::{Path, PathBuf};

use conceptmap_editor::{AutosaveConfig, HISTORY_LIMIT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_NAME: &str = "conceptmap.config.json";

/// ConceptMap configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding stored documents and the last-opened pointer
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub autosave: AutosaveSettings,

    /// Undo levels kept per document (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

fn default_data_dir() -> String {
    ".conceptmap".to_string()
}

fn default_history_limit() -> usize {
    HISTORY_LIMIT
}

fn default_debounce_ms() -> u64 {
    800
}

fn default_throttle_ms() -> u64 {
    1200
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get absolute path to the data directory
    pub fn data_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.data_dir)
    }

    pub fn autosave_config(&self) -> AutosaveConfig {
        AutosaveConfig::from_millis(self.autosave.debounce_ms, self.autosave.throttle_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            autosave: AutosaveSettings::default(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            throttle_ms: default_throttle_ms(),
        }
    }
}
