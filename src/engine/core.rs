// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core" that consumes
//! [`RuntimeEvent`]s (plus the current instant) and produces:
//! - an updated core state (debounce timestamps, capture slots)
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - spawning capture tasks
//! - registering new directories with the OS watcher
//!
//! Time is passed in, so the core can be tested without Tokio, channels,
//! the filesystem or real clocks.

use std::time::{Duration, Instant};

use crate::engine::event_handlers::{handle_capture_completed, handle_file_change, CoreStep};
use crate::engine::slots::CaptureSlots;
use crate::engine::RuntimeEvent;
use crate::types::BusyBehaviour;
use crate::watch::{ControlDirs, Debouncer, PathClassifier, WatchSet};

/// Pure core state.
///
/// Owns the classifier, the debouncer and the capture slots. It has **no**
/// channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct WatchCore {
    classifier: PathClassifier,
    debouncer: Debouncer,
    slots: CaptureSlots,
}

impl WatchCore {
    pub fn new(
        watch_set: WatchSet,
        control: ControlDirs,
        quiet_window: Duration,
        behaviour: BusyBehaviour,
    ) -> Self {
        Self {
            classifier: PathClassifier::new(watch_set, control),
            debouncer: Debouncer::new(quiet_window),
            slots: CaptureSlots::new(behaviour),
        }
    }

    pub fn watch_set(&self) -> &WatchSet {
        self.classifier.watch_set()
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn slots(&self) -> &CaptureSlots {
        &self.slots
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent, now: Instant) -> CoreStep {
        match event {
            RuntimeEvent::FileChanged(raw) => {
                handle_file_change(&self.classifier, &self.debouncer, &mut self.slots, raw, now)
            }
            RuntimeEvent::CaptureCompleted { project, outcome } => {
                handle_capture_completed(&self.classifier, &mut self.slots, project, outcome)
            }
            RuntimeEvent::ShutdownRequested => CoreStep::stop(),
        }
    }
}
