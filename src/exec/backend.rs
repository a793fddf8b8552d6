// src/exec/backend.rs

//! Pluggable snapshot trigger abstraction.
//!
//! The runtime talks to a `SnapshotTrigger` instead of spawning processes
//! itself. Production uses [`CommandTrigger`](super::command::CommandTrigger);
//! tests provide triggers that record calls or fail on demand.

use std::future::Future;
use std::pin::Pin;

use crate::engine::CaptureOutcome;
use crate::errors::Result;
use crate::registry::TrackedProject;

/// Boxed future returned by [`SnapshotTrigger::capture`].
pub type CaptureFuture<'a> = Pin<Box<dyn Future<Output = Result<CaptureOutcome>> + Send + 'a>>;

/// The action that saves a vibe for one project.
///
/// `Ok(CaptureOutcome::Failed(code))` is a capture that ran and reported
/// failure; `Err(_)` is a capture that could not run at all. Both are logged
/// by the caller and neither stops the watcher.
pub trait SnapshotTrigger: Send + Sync + 'static {
    fn capture<'a>(&'a self, project: &'a TrackedProject) -> CaptureFuture<'a>;
}
