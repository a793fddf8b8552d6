// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Registering project trees with a cross-platform watcher (`notify`),
//!   never descending into control directories.
//! - Mapping raw notify events to Write / Create / Other.
//! - Attributing an event path to its tracked project.
//! - Per-project debouncing.
//!
//! It does **not** run captures; it only decides which project changed.

pub mod classifier;
pub mod debounce;
pub mod event;
pub mod exclude;
pub mod watcher;

pub use classifier::{PathClassifier, WatchSet};
pub use debounce::Debouncer;
pub use event::{RawEvent, RawEventKind};
pub use exclude::ControlDirs;
pub use watcher::{spawn_watcher, RegistrationReport, WatcherHandle};
