// src/watch/debounce.rs

//! Per-project quiet-window debouncing.
//!
//! A single save in an editor usually produces a burst of events; only the
//! first one of a burst is let through.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use crate::types::{ProjectId, QUIET_WINDOW};

/// Last accepted trigger per project.
///
/// The check-and-set in [`Debouncer::should_trigger`] holds the map entry's
/// shard lock, so two concurrent callers for the same project can never both
/// observe "no recent trigger".
#[derive(Debug)]
pub struct Debouncer {
    quiet_window: Duration,
    last_trigger: DashMap<ProjectId, Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(QUIET_WINDOW)
    }
}

impl Debouncer {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            last_trigger: DashMap::new(),
        }
    }

    /// Returns true (and records `now`) if `project` has never triggered or
    /// its last trigger is strictly more than the quiet window before `now`.
    pub fn should_trigger(&self, project: &str, now: Instant) -> bool {
        match self.last_trigger.entry(project.to_string()) {
            Entry::Occupied(mut entry) => {
                let elapsed = now.saturating_duration_since(*entry.get());
                if elapsed > self.quiet_window {
                    entry.insert(now);
                    true
                } else {
                    trace!(project, ?elapsed, "within quiet window");
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    pub fn last_trigger(&self, project: &str) -> Option<Instant> {
        self.last_trigger.get(project).map(|entry| *entry.value())
    }
}
