//! File logging
//!
//! The terminal belongs to the UI, so log records go to a file.

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "tabview.log";

/// `~/.tabview/tabview.log`, or `tabview.log` in the working directory when
/// there is no home directory
pub fn default_log_path() -> PathBuf {
    crate::config::Config::config_dir()
        .map(|dir| dir.join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}

/// Install the global logger writing to `path`, truncating earlier runs
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).context("installing logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_file_name() {
        assert!(default_log_path().ends_with(LOG_FILE_NAME));
    }
}
