// src/watch/classifier.rs

//! Attribution of event paths to tracked projects.

use std::path::Path;

use tracing::trace;

use crate::registry::TrackedProject;
use crate::watch::exclude::ControlDirs;

/// The projects monitored by one watch session.
///
/// Fixed for the lifetime of the session.
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    projects: Vec<TrackedProject>,
}

impl WatchSet {
    pub fn new(projects: Vec<TrackedProject>) -> Self {
        Self { projects }
    }

    /// Projects in registry order.
    pub fn projects(&self) -> &[TrackedProject] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TrackedProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// The project whose root is the longest component-wise prefix of `path`.
    ///
    /// `/proj/webapp/x` is not under `/proj/web`: `Path::starts_with` compares
    /// whole components.
    pub fn owner_of(&self, path: &Path) -> Option<&TrackedProject> {
        self.projects
            .iter()
            .filter(|p| path.starts_with(&p.root))
            .max_by_key(|p| p.root.components().count())
    }
}

/// Decides whether an event path is relevant and which project owns it.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    watch_set: WatchSet,
    control: ControlDirs,
}

impl PathClassifier {
    pub fn new(watch_set: WatchSet, control: ControlDirs) -> Self {
        Self { watch_set, control }
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    /// Owning project for `path`, or `None` if the path is outside every root
    /// or lies under a control directory of its owner.
    pub fn classify(&self, path: &Path) -> Option<&TrackedProject> {
        let owner = self.watch_set.owner_of(path)?;
        let rel = path.strip_prefix(&owner.root).ok()?;

        if self.control.is_excluded_rel(rel) {
            trace!(?path, project = %owner.id, "path under control directory; ignoring");
            return None;
        }

        Some(owner)
    }
}
