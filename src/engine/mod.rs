// src/engine/mod.rs

//! Orchestration engine for vibe-watch.
//!
//! This module ties together:
//! - the path classifier and per-project debouncer
//! - the per-project capture slots (at most one capture per project)
//! - the main runtime event loop that reacts to:
//!   - file-change events from the watcher
//!   - capture completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::types::ProjectId;
use crate::watch::RawEvent;

/// Outcome of a capture for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Success,
    Failed(i32),
}

impl CaptureOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, CaptureOutcome::Success)
    }
}

/// Events flowing into the runtime from the watcher and capture tasks.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The OS reported a change.
    FileChanged(RawEvent),
    /// A capture task finished (successfully or not).
    CaptureCompleted {
        project: ProjectId,
        outcome: CaptureOutcome,
    },
    /// Stop the event loop (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod slots;

pub use self::core::WatchCore;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
pub use slots::{CaptureSlots, SlotDecision};
pub use crate::types::BusyBehaviour;
