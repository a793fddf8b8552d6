#![allow(dead_code)]

use std::path::PathBuf;

use vibewatch::config::{CaptureSection, ConfigFile, ConfigSection, RawConfigFile, WatchSection};
use vibewatch::registry::{Registry, TrackedProject};
use vibewatch::types::BusyBehaviour;
use vibewatch::watch::WatchSet;

/// Builder for `Registry` / `WatchSet` to simplify test setup.
pub struct ProjectsBuilder {
    projects: Vec<TrackedProject>,
}

impl ProjectsBuilder {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
        }
    }

    pub fn with_project(mut self, id: &str, root: impl Into<PathBuf>) -> Self {
        self.projects.push(TrackedProject::new(id, root));
        self
    }

    pub fn build_registry(self) -> Registry {
        Registry {
            projects: self.projects,
        }
    }

    pub fn build_watch_set(self) -> WatchSet {
        WatchSet::new(self.projects)
    }
}

impl Default for ProjectsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ConfigFile`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                capture: CaptureSection::default(),
                watch: WatchSection::default(),
            },
        }
    }

    pub fn busy_behaviour(mut self, behaviour: BusyBehaviour) -> Self {
        self.config.config.triggered_while_busy = behaviour;
        self
    }

    pub fn capture(mut self, cmd: &str, args: &[&str]) -> Self {
        self.config.capture.cmd = cmd.to_string();
        self.config.capture.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
