// src/watch/exclude.rs

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::types::CONTROL_DIRS;

/// Directory names that are never watched.
///
/// Always contains the reserved control directories (`.vibes`, `.git`);
/// config may add extra directory-name globs such as `node_modules`.
#[derive(Clone)]
pub struct ControlDirs {
    patterns: Vec<String>,
    extra: Option<GlobSet>,
}

impl fmt::Debug for ControlDirs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlDirs")
            .field("reserved", &CONTROL_DIRS)
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl Default for ControlDirs {
    fn default() -> Self {
        Self::reserved()
    }
}

impl ControlDirs {
    /// Only the reserved control directories.
    pub fn reserved() -> Self {
        Self {
            patterns: Vec::new(),
            extra: None,
        }
    }

    /// Reserved directories plus the given directory-name globs.
    pub fn with_patterns(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::reserved());
        }

        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let glob = Glob::new(pat)
                .with_context(|| format!("invalid exclude pattern: {pat}"))?;
            builder.add(glob);
        }
        let set = builder.build().context("building exclude globset")?;

        Ok(Self {
            patterns: patterns.to_vec(),
            extra: Some(set),
        })
    }

    /// Configured extra patterns (reserved names not included).
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if a directory with this name must not be watched.
    pub fn is_excluded_name(&self, name: &OsStr) -> bool {
        if CONTROL_DIRS.iter().any(|reserved| name == OsStr::new(reserved)) {
            return true;
        }
        match &self.extra {
            Some(set) => set.is_match(Path::new(name)),
            None => false,
        }
    }

    /// True if any component of `rel` (a path relative to a project root)
    /// is an excluded name.
    pub fn is_excluded_rel(&self, rel: &Path) -> bool {
        rel.components().any(|component| match component {
            Component::Normal(name) => self.is_excluded_name(name),
            _ => false,
        })
    }
}
