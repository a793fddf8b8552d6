// src/registry/model.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, VibeError};
use crate::types::ProjectId;
use crate::watch::classifier::WatchSet;

/// A registered directory the tool monitors and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedProject {
    pub id: ProjectId,
    #[serde(rename = "path")]
    pub root: PathBuf,
}

impl TrackedProject {
    pub fn new(id: impl Into<ProjectId>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
        }
    }
}

/// On-disk shape of `tracked.json`:
///
/// ```json
/// { "projects": [ { "id": "web", "path": "/proj/web" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub projects: Vec<TrackedProject>,
}

/// Result of [`Registry::track`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Added(TrackedProject),
    AlreadyTracked(TrackedProject),
}

impl Registry {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TrackedProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Check that ids and roots are unique. Run after every load so a
    /// hand-edited file cannot feed ambiguous roots to the classifier.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut roots = HashSet::new();
        for project in &self.projects {
            if project.id.trim().is_empty() {
                return Err(VibeError::RegistryError(format!(
                    "project at {:?} has an empty id",
                    project.root
                )));
            }
            if !ids.insert(project.id.as_str()) {
                return Err(VibeError::RegistryError(format!(
                    "project id '{}' appears more than once",
                    project.id
                )));
            }
            if !roots.insert(project.root.as_path()) {
                return Err(VibeError::RegistryError(format!(
                    "path {:?} is tracked more than once",
                    project.root
                )));
            }
        }
        Ok(())
    }

    /// Register `root` under `id` (or the directory name when `id` is None).
    ///
    /// Tracking an already-tracked root is a no-op. Reusing an id that
    /// belongs to another root is an error.
    pub fn track(&mut self, root: PathBuf, id: Option<String>) -> Result<TrackOutcome> {
        if let Some(existing) = self.projects.iter().find(|p| p.root == root) {
            debug!(id = %existing.id, ?root, "path already tracked");
            return Ok(TrackOutcome::AlreadyTracked(existing.clone()));
        }

        let id = match id {
            Some(id) => id.trim().to_string(),
            None => derive_id(&root),
        };
        if id.is_empty() {
            return Err(VibeError::RegistryError(
                "project id must not be empty".to_string(),
            ));
        }
        if self.get(&id).is_some() {
            return Err(VibeError::DuplicateProject(id));
        }

        let project = TrackedProject::new(id, root);
        self.projects.push(project.clone());
        Ok(TrackOutcome::Added(project))
    }

    pub fn untrack(&mut self, id: &str) -> Result<TrackedProject> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| VibeError::ProjectNotFound(id.to_string()))?;
        Ok(self.projects.remove(idx))
    }

    /// Build the set of projects a watch session monitors.
    ///
    /// - `None`: every tracked project.
    /// - `Some(id)`: only that project; unknown ids are an error.
    pub fn select(&self, filter: Option<&str>) -> Result<WatchSet> {
        if self.projects.is_empty() {
            return Err(VibeError::NoTrackedProjects);
        }

        match filter {
            None => Ok(WatchSet::new(self.projects.clone())),
            Some(id) => {
                let project = self
                    .get(id)
                    .ok_or_else(|| VibeError::ProjectNotFound(id.to_string()))?;
                Ok(WatchSet::new(vec![project.clone()]))
            }
        }
    }
}

/// Directory name of `root`, or `"root"` for `/`.
pub fn derive_id(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}
