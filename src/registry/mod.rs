// src/registry/mod.rs

//! Tracked-project registry: the durable id -> root mapping the watcher
//! reads once at startup.

pub mod model;
pub mod store;

pub use model::{derive_id, Registry, TrackOutcome, TrackedProject};
pub use store::{
    default_registry_path, JsonRegistryStore, MemoryRegistryStore, RegistryStore,
    REGISTRY_FILE,
};
