// src/registry/store.rs

//! Durable storage for the project registry.
//!
//! The registry is read fresh by every command through a [`RegistryStore`];
//! nothing keeps it in process-wide state.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing::debug;

use crate::config::central_dir;
use crate::errors::{Result, VibeError};
use crate::registry::model::Registry;

/// File name of the registry inside `~/.vibe`.
pub const REGISTRY_FILE: &str = "tracked.json";

/// Explicit load/save access to the registry.
pub trait RegistryStore: Send + Sync {
    /// Load the registry. A store that has never been saved loads as empty.
    fn load(&self) -> Result<Registry>;

    fn save(&self, registry: &Registry) -> Result<()>;
}

/// Registry kept as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonRegistryStore {
    path: PathBuf,
}

impl JsonRegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for JsonRegistryStore {
    fn load(&self) -> Result<Registry> {
        if !self.path.exists() {
            debug!(path = ?self.path, "registry file missing; treating as empty");
            return Ok(Registry::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            VibeError::RegistryError(format!("reading {:?}: {}", self.path, e))
        })?;

        let registry: Registry = serde_json::from_str(&contents).map_err(|e| {
            VibeError::RegistryError(format!("parsing {:?}: {}", self.path, e))
        })?;

        registry.validate()?;
        Ok(registry)
    }

    fn save(&self, registry: &Registry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {:?}", parent))?;
        }
        let data = serde_json::to_string_pretty(registry)?;
        fs::write(&self.path, data)
            .with_context(|| format!("writing registry {:?}", self.path))?;
        debug!(path = ?self.path, projects = registry.projects.len(), "registry saved");
        Ok(())
    }
}

/// In-memory store (lost on restart).
#[derive(Debug, Default)]
pub struct MemoryRegistryStore {
    registry: Mutex<Registry>,
}

impl MemoryRegistryStore {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }
}

impl RegistryStore for MemoryRegistryStore {
    fn load(&self) -> Result<Registry> {
        let guard = self
            .registry
            .lock()
            .map_err(|_| VibeError::RegistryError("registry mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, registry: &Registry) -> Result<()> {
        let mut guard = self
            .registry
            .lock()
            .map_err(|_| VibeError::RegistryError("registry mutex poisoned".to_string()))?;
        *guard = registry.clone();
        Ok(())
    }
}

/// Default registry location: `~/.vibe/tracked.json`.
pub fn default_registry_path() -> Result<PathBuf> {
    Ok(central_dir()?.join(REGISTRY_FILE))
}
