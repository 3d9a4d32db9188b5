use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// How exported artifacts are named on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportNaming {
    /// `data.<ext>`
    #[default]
    Plain,
    /// `data-<dataset>.<ext>`
    Dataset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rows per page
    pub page_size: usize,
    /// Directory exported artifacts are written to
    pub export_dir: String,
    /// Whether the global search box is available
    pub search_enabled: bool,
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Log level name (error, warn, info, debug, trace, off)
    pub log_level: String,
    pub export_naming: ExportNaming,
    /// Shell command that replaces the built-in export encoders
    pub export_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 10,
            export_dir: ".".to_string(),
            search_enabled: true,
            tick_rate_ms: 100,
            log_level: "info".to_string(),
            export_naming: ExportNaming::Plain,
            export_command: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".tabview"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the saved config. Missing or unreadable files give None.
    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring invalid config {}: {}", config_path.display(), e);
                None
            }
        }
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
