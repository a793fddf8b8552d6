// src/config/model.rs

use serde::Deserialize;

use crate::types::BusyBehaviour;

/// Top-level watcher configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// triggered_while_busy = "queue"
///
/// [capture]
/// cmd = "vibe"
/// args = ["save", "Auto-save: file change"]
///
/// [watch]
/// exclude = ["node_modules", "target"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub capture: CaptureSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated configuration. Only constructed through `TryFrom<RawConfigFile>`
/// (see `validate.rs`) or [`ConfigFile::new_unchecked`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub capture: CaptureSection,
    pub watch: WatchSection,
}

impl ConfigFile {
    pub fn new_unchecked(
        config: ConfigSection,
        capture: CaptureSection,
        watch: WatchSection,
    ) -> Self {
        Self {
            config,
            capture,
            watch,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.config, raw.capture, raw.watch)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct ConfigSection {
    /// `"queue"` (default) or `"drop"`: what to do with a trigger accepted
    /// while the same project's capture is still running.
    #[serde(default)]
    pub triggered_while_busy: BusyBehaviour,
}

/// `[capture]` section: the external command that saves a vibe.
///
/// It is run with the project root as working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureSection {
    #[serde(default = "default_capture_cmd")]
    pub cmd: String,

    #[serde(default = "default_capture_args")]
    pub args: Vec<String>,
}

fn default_capture_cmd() -> String {
    "vibe".to_string()
}

fn default_capture_args() -> Vec<String> {
    vec!["save".to_string(), "Auto-save: file change".to_string()]
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            cmd: default_capture_cmd(),
            args: default_capture_args(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WatchSection {
    /// Extra directory-name globs to skip, on top of `.vibes` and `.git`.
    #[serde(default)]
    pub exclude: Vec<String>,
}
