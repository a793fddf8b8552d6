// src/watch/event.rs

//! Raw filesystem events as seen by the watcher core.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

/// The only distinction the core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    Write,
    Create,
    /// A path went away (deleted or renamed out of its directory).
    Remove,
    Other,
}

impl RawEventKind {
    /// Write and Create are the kinds that can trigger a capture.
    pub fn is_relevant(self) -> bool {
        matches!(self, RawEventKind::Write | RawEventKind::Create)
    }
}

impl From<&EventKind> for RawEventKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => RawEventKind::Create,
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                RawEventKind::Write
            }
            // Editors often save by renaming a temp file over the target: the
            // new name shows up as a rename destination.
            EventKind::Modify(ModifyKind::Name(RenameMode::To))
            | EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => RawEventKind::Create,
            EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                RawEventKind::Remove
            }
            _ => RawEventKind::Other,
        }
    }
}

/// A single (path, kind) notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: RawEventKind,
}

impl RawEvent {
    pub fn new(path: impl Into<PathBuf>, kind: RawEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RawEventKind::Write)
    }

    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RawEventKind::Create)
    }

    pub fn remove(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RawEventKind::Remove)
    }

    /// Split a notify event into one raw event per path.
    pub fn from_notify(event: &Event) -> Vec<RawEvent> {
        let kind = RawEventKind::from(&event.kind);
        event
            .paths
            .iter()
            .map(|path| RawEvent::new(path.clone(), kind))
            .collect()
    }
}
