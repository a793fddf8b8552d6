// src/config/mod.rs

//! Configuration loading and validation for vibe-watch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate capture command and exclude globs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    central_dir, default_config_path, load_and_validate, load_from_path, load_or_default,
};
pub use model::{CaptureSection, ConfigFile, ConfigSection, RawConfigFile, WatchSection};
