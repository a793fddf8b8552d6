// src/engine/runtime.rs

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::{spawn_capture, SnapshotTrigger};
use crate::registry::TrackedProject;
use crate::watch::WatcherHandle;

use super::core::WatchCore;
use super::{CoreCommand, RuntimeEvent};

/// Drives the watcher core in response to `RuntimeEvent`s and hands accepted
/// triggers to a `SnapshotTrigger`.
///
/// This is a pure IO shell around `WatchCore`, which contains all the
/// semantics. Captures are spawned as independent tasks and never awaited
/// here, so a slow capture cannot stall event delivery.
pub struct Runtime<T: SnapshotTrigger> {
    core: WatchCore,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    trigger: Arc<T>,
    source: Option<WatcherHandle>,
}

impl<T: SnapshotTrigger> fmt::Debug for Runtime<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<T: SnapshotTrigger> Runtime<T> {
    /// `runtime_tx` must feed `event_rx`; capture tasks report completion
    /// through it.
    pub fn new(
        core: WatchCore,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        trigger: T,
    ) -> Self {
        Self {
            core,
            event_rx,
            runtime_tx,
            trigger: Arc::new(trigger),
            source: None,
        }
    }

    /// Attach the OS watcher so directories created while running get
    /// registered. Without a source, `WatchNewPath` commands are ignored.
    pub fn with_source(mut self, source: WatcherHandle) -> Self {
        self.source = Some(source);
        self
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core.
    /// - Executes the commands returned by the core.
    ///
    /// The watcher handle is dropped (and the OS watches released) when this
    /// returns.
    pub async fn run(mut self) -> Result<()> {
        info!(projects = self.core.watch_set().len(), "vibe-watch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event, Instant::now());

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::ReportChange { project, path } => {
                println!("[VIBE] 🔍 Change detected in '{}': {}", project, path.display());
            }
            CoreCommand::StartCapture(project) => self.start_capture(project),
            CoreCommand::WatchNewPath(path) => self.watch_new_path(&path),
            CoreCommand::ForgetPath(path) => {
                if let Some(source) = self.source.as_mut() {
                    source.forget_dir(&path);
                }
            }
        }
    }

    fn start_capture(&self, project: TrackedProject) {
        debug!(project = %project.id, "dispatching capture");
        spawn_capture(Arc::clone(&self.trigger), project, self.runtime_tx.clone());
    }

    fn watch_new_path(&mut self, path: &Path) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        // A symlink to a directory is not followed: its target is outside
        // the project even when the link is inside it.
        let is_real_dir = fs::symlink_metadata(path)
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_real_dir {
            return;
        }
        let report = source.register_new_dir(path);
        debug!(
            ?path,
            registered = report.registered,
            failed = report.failed,
            "registered new directory"
        );
    }
}
