use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vibewatch::engine::CaptureOutcome;
use vibewatch::errors::VibeError;
use vibewatch::exec::{CaptureFuture, SnapshotTrigger};
use vibewatch::registry::TrackedProject;

/// A fake snapshot trigger that:
/// - records which projects were captured, in start order
/// - optionally takes `delay` to "capture"
/// - fails (exit code 1) for projects listed in `failing`, or errors out for
///   projects listed in `erroring`
/// - tracks the highest number of captures running at once per trigger
#[derive(Clone, Default)]
pub struct RecordingTrigger {
    captured: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    failing: HashSet<String>,
    erroring: HashSet<String>,
    running: Arc<AtomicUsize>,
    max_running: Arc<AtomicUsize>,
}

impl RecordingTrigger {
    pub fn new(captured: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            captured,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, project: &str) -> Self {
        self.failing.insert(project.to_string());
        self
    }

    pub fn erroring(mut self, project: &str) -> Self {
        self.erroring.insert(project.to_string());
        self
    }

    /// Shared counter of the peak number of concurrent captures.
    pub fn max_running(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.max_running)
    }
}

impl SnapshotTrigger for RecordingTrigger {
    fn capture<'a>(&'a self, project: &'a TrackedProject) -> CaptureFuture<'a> {
        Box::pin(async move {
            self.captured.lock().unwrap().push(project.id.clone());

            let now_running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now_running, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.running.fetch_sub(1, Ordering::SeqCst);

            if self.erroring.contains(&project.id) {
                return Err(VibeError::Other(anyhow::anyhow!(
                    "simulated capture error for {}",
                    project.id
                )));
            }
            if self.failing.contains(&project.id) {
                return Ok(CaptureOutcome::Failed(1));
            }
            Ok(CaptureOutcome::Success)
        })
    }
}
