// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, VibeError};

/// Name of the central directory under the user's home.
pub const CENTRAL_DIR: &str = ".vibe";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Like [`load_and_validate`], but a missing file yields the defaults.
///
/// Any other read or parse failure is still an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(?path, "no config file; using defaults");
        return Ok(ConfigFile::default());
    }
    load_and_validate(path)
}

/// `~/.vibe`, where the registry and the watcher config live.
pub fn central_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CENTRAL_DIR))
        .ok_or_else(|| {
            VibeError::ConfigError("could not determine home directory".to_string())
        })
}

/// Default config location: `~/.vibe/watch.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(central_dir()?.join("watch.toml"))
}
