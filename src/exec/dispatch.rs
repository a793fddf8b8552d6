// src/exec/dispatch.rs

//! Fire-and-forget capture tasks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::engine::{CaptureOutcome, RuntimeEvent};
use crate::exec::backend::SnapshotTrigger;
use crate::registry::TrackedProject;

/// Run one capture as an independent Tokio task.
///
/// The task reports `RuntimeEvent::CaptureCompleted` when done, whatever the
/// outcome, so the project's capture slot is always released.
pub fn spawn_capture<T: SnapshotTrigger>(
    trigger: Arc<T>,
    project: TrackedProject,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = run_capture(trigger.as_ref(), &project).await;

        if runtime_tx
            .send(RuntimeEvent::CaptureCompleted {
                project: project.id.clone(),
                outcome,
            })
            .await
            .is_err()
        {
            debug!(project = %project.id, "runtime gone before capture completed");
        }
    })
}

/// Invoke the trigger and turn every failure mode into a logged outcome.
pub async fn run_capture<T: SnapshotTrigger + ?Sized>(
    trigger: &T,
    project: &TrackedProject,
) -> CaptureOutcome {
    println!("[VIBE] 💾 Auto-saving vibe for '{}'...", project.id);

    match trigger.capture(project).await {
        Ok(CaptureOutcome::Success) => {
            println!("[VIBE] ✅ Auto-save complete for '{}'.", project.id);
            CaptureOutcome::Success
        }
        Ok(CaptureOutcome::Failed(code)) => {
            warn!(project = %project.id, exit_code = code, "capture failed");
            println!(
                "[VIBE] ❌ Auto-save failed for '{}' (exit code {}).",
                project.id, code
            );
            CaptureOutcome::Failed(code)
        }
        Err(err) => {
            error!(project = %project.id, error = %err, "capture error");
            println!("[VIBE] ❌ Auto-save failed for '{}': {}", project.id, err);
            CaptureOutcome::Failed(-1)
        }
    }
}
