//! Subcommands.

pub mod config;
pub mod run;
pub mod split;

use std::path::{Path, PathBuf};

use einv_core::EinvConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("einv")
        .join("config.json")
}

/// Load the configuration from `path`, the default file if it exists, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<EinvConfig> {
    if let Some(path) = path {
        return Ok(EinvConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(EinvConfig::from_file(&default_path)?)
    } else {
        Ok(EinvConfig::default())
    }
}
