//! Storage locations
//!
//! Where persisted settings live on disk.

use anyhow::Result;
use std::path::PathBuf;

/// File name of the persisted settings
pub const SETTINGS_FILE: &str = "settings.toml";

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "playeranthems", "PlayerAnthems")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default path of the persisted settings file
pub fn default_settings_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(SETTINGS_FILE))
}
