use crate::config::settings::ParlatoConfig;
use crate::error::{ParlatoError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Get XDG-compliant config directory
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "parlato")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ParlatoError::Config("Could not determine config directory".to_string()))
}

/// Get XDG-compliant data directory
pub fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "parlato")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ParlatoError::Config("Could not determine data directory".to_string()))
}

/// Get config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get models directory
pub fn models_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("models"))
}

/// Load config from file, creating default if not exists
pub fn load_config() -> Result<ParlatoConfig> {
    let path = config_path()?;

    if !path.exists() {
        let config = ParlatoConfig::default();
        save_config(&config)?;
        return Ok(config);
    }

    let content = fs::read_to_string(&path)?;
    let config: ParlatoConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save config to file
pub fn save_config(config: &ParlatoConfig) -> Result<()> {
    let path = config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(&path, content)?;
    Ok(())
}

/// Ensure config and data directories exist
pub fn ensure_directories() -> Result<()> {
    fs::create_dir_all(config_dir()?)?;
    fs::create_dir_all(data_dir()?)?;
    fs::create_dir_all(models_dir()?)?;
    Ok(())
}
