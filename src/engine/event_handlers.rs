// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::engine::slots::{CaptureSlots, SlotDecision};
use crate::engine::CaptureOutcome;
use crate::registry::TrackedProject;
use crate::types::ProjectId;
use crate::watch::{Debouncer, PathClassifier, RawEvent, RawEventKind};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Tell the user a change was accepted for `project`.
    ReportChange { project: ProjectId, path: PathBuf },
    /// Start a capture for this project.
    StartCapture(TrackedProject),
    /// A path was created inside a project; if it is a directory it has to be
    /// registered with the OS watcher.
    WatchNewPath(PathBuf),
    /// A path inside a project went away; drop any registrations at or below
    /// it.
    ForgetPath(PathBuf),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, Default)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub fn stop() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: false,
        }
    }
}

/// Handle a raw filesystem event.
///
/// 1. Removals only release watcher bookkeeping; other kinds than Write /
///    Create are ignored.
/// 2. Attribute the path to a project (or drop it).
/// 3. Ask the debouncer; events inside the quiet window are dropped.
/// 4. Route the accepted trigger through the project's capture slot.
pub fn handle_file_change(
    classifier: &PathClassifier,
    debouncer: &Debouncer,
    slots: &mut CaptureSlots,
    event: RawEvent,
    now: Instant,
) -> CoreStep {
    let mut commands = Vec::new();

    if event.kind == RawEventKind::Remove {
        if classifier.classify(&event.path).is_some() {
            commands.push(CoreCommand::ForgetPath(event.path));
        }
        return CoreStep::continue_with(commands);
    }

    if !event.kind.is_relevant() {
        trace!(path = ?event.path, kind = ?event.kind, "ignoring event kind");
        return CoreStep::continue_with(commands);
    }

    let Some(project) = classifier.classify(&event.path) else {
        trace!(path = ?event.path, "event outside watched projects");
        return CoreStep::continue_with(commands);
    };

    // New directories must be registered even when the trigger itself is
    // debounced, or later edits inside them would go unseen.
    if event.kind == RawEventKind::Create {
        commands.push(CoreCommand::WatchNewPath(event.path.clone()));
    }

    if !debouncer.should_trigger(&project.id, now) {
        debug!(project = %project.id, path = ?event.path, "debounced");
        return CoreStep::continue_with(commands);
    }

    commands.push(CoreCommand::ReportChange {
        project: project.id.clone(),
        path: event.path.clone(),
    });

    match slots.request(&project.id) {
        SlotDecision::Start => commands.push(CoreCommand::StartCapture(project.clone())),
        decision => {
            debug!(project = %project.id, ?decision, "capture already running");
        }
    }

    CoreStep::continue_with(commands)
}

/// Handle the end of a capture: free the slot or start the queued follow-up.
pub fn handle_capture_completed(
    classifier: &PathClassifier,
    slots: &mut CaptureSlots,
    project: ProjectId,
    outcome: CaptureOutcome,
) -> CoreStep {
    debug!(project = %project, ?outcome, "capture completed");

    if !slots.complete(&project) {
        return CoreStep::continue_with(Vec::new());
    }

    match classifier.watch_set().get(&project) {
        Some(tracked) => {
            debug!(project = %project, "starting queued capture");
            CoreStep::continue_with(vec![CoreCommand::StartCapture(tracked.clone())])
        }
        None => {
            warn!(project = %project, "queued capture for unknown project");
            CoreStep::continue_with(Vec::new())
        }
    }
}
