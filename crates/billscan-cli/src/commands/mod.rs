//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
mod output;

use std::path::{Path, PathBuf};

use tracing::debug;

use billscan_core::models::config::BillscanConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billscan")
        .join("config.json")
}

/// Load the configuration: an explicit path, else the default file if it
/// exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillscanConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(BillscanConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(BillscanConfig::from_file(&default_path)?)
    } else {
        Ok(BillscanConfig::default())
    }
}
