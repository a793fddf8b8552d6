// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, VibeError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::VibeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.capture, raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_capture(cfg)?;
    validate_excludes(cfg)?;
    Ok(())
}

fn validate_capture(cfg: &RawConfigFile) -> Result<()> {
    if cfg.capture.cmd.trim().is_empty() {
        return Err(VibeError::ConfigError(
            "[capture].cmd must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_excludes(cfg: &RawConfigFile) -> Result<()> {
    for pattern in cfg.watch.exclude.iter() {
        if pattern.contains('/') || pattern.contains('\\') {
            return Err(VibeError::ConfigError(format!(
                "[watch].exclude entry '{}' must be a directory name, not a path",
                pattern
            )));
        }
        if let Err(err) = Glob::new(pattern) {
            return Err(VibeError::ConfigError(format!(
                "[watch].exclude entry '{}' is not a valid glob: {}",
                pattern, err
            )));
        }
    }
    Ok(())
}
