// src/engine/slots.rs

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::types::{BusyBehaviour, ProjectId};

/// What happened to a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDecision {
    /// Slot was free; the capture should start now.
    Start,
    /// Slot busy; a follow-up capture will start when it frees up.
    Queued,
    /// Slot busy and a follow-up is already queued; nothing changes.
    AlreadyQueued,
    /// Slot busy and the behaviour is `Drop`.
    Dropped,
}

#[derive(Debug, Default, Clone, Copy)]
struct Slot {
    running: bool,
    pending: bool,
}

/// One capture slot per project.
///
/// Semantics:
/// - A project never has more than one capture running.
/// - In `Queue` mode at most one follow-up is remembered per project; any
///   number of triggers while busy collapse into it.
/// - In `Drop` mode triggers while busy are ignored.
#[derive(Debug)]
pub struct CaptureSlots {
    behaviour: BusyBehaviour,
    slots: HashMap<ProjectId, Slot>,
}

impl CaptureSlots {
    pub fn new(behaviour: BusyBehaviour) -> Self {
        Self {
            behaviour,
            slots: HashMap::new(),
        }
    }

    pub fn behaviour(&self) -> BusyBehaviour {
        self.behaviour
    }

    pub fn is_running(&self, project: &str) -> bool {
        self.slots.get(project).is_some_and(|s| s.running)
    }

    pub fn has_pending(&self, project: &str) -> bool {
        self.slots.get(project).is_some_and(|s| s.pending)
    }

    /// True if no project has a capture running.
    pub fn is_idle(&self) -> bool {
        self.slots.values().all(|s| !s.running)
    }

    /// Ask to start a capture for `project`.
    pub fn request(&mut self, project: &str) -> SlotDecision {
        let slot = self.slots.entry(project.to_string()).or_default();

        if !slot.running {
            slot.running = true;
            return SlotDecision::Start;
        }

        match self.behaviour {
            BusyBehaviour::Queue if slot.pending => SlotDecision::AlreadyQueued,
            BusyBehaviour::Queue => {
                slot.pending = true;
                debug!(project, "capture running; queued one follow-up");
                SlotDecision::Queued
            }
            BusyBehaviour::Drop => {
                debug!(project, "capture running; dropping trigger");
                SlotDecision::Dropped
            }
        }
    }

    /// Record that the running capture for `project` finished.
    ///
    /// Returns true if a queued follow-up should start now; the slot then
    /// stays occupied by that follow-up.
    pub fn complete(&mut self, project: &str) -> bool {
        let Some(slot) = self.slots.get_mut(project) else {
            warn!(project, "completion for a project with no capture slot");
            return false;
        };

        if !slot.running {
            warn!(project, "completion for a project with no running capture");
            return false;
        }

        if slot.pending {
            slot.pending = false;
            true
        } else {
            slot.running = false;
            false
        }
    }
}
