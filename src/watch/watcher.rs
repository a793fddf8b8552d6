// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::watch::event::RawEvent;
use crate::watch::exclude::ControlDirs;

/// Outcome of registering one directory tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Directories newly registered with the OS watcher.
    pub registered: usize,
    /// Directories that were already registered (nested roots).
    pub skipped: usize,
    /// Directories that could not be walked or registered.
    pub failed: usize,
}

/// Handle for the filesystem watcher.
///
/// Owns the underlying `RecommendedWatcher`; dropping this handle stops file
/// watching. Directories are registered one by one (non-recursively) so that
/// control directories are never handed to the OS at all.
pub struct WatcherHandle {
    inner: RecommendedWatcher,
    control: ControlDirs,
    registered: HashSet<PathBuf>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("registered", &self.registered.len())
            .finish_non_exhaustive()
    }
}

/// Create the OS watcher and a forwarding task that turns notify events into
/// `RuntimeEvent::FileChanged`.
///
/// No directory is watched yet; call [`WatcherHandle::register_tree`] for each
/// project root. Must be called from within a Tokio runtime.
pub fn spawn_watcher(
    control: ControlDirs,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("vibe-watch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("vibe-watch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");
            for raw in RawEvent::from_notify(&event) {
                if runtime_tx.send(RuntimeEvent::FileChanged(raw)).await.is_err() {
                    debug!("runtime channel closed; stopping event forwarding");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        inner: watcher,
        control,
        registered: HashSet::new(),
    })
}

impl WatcherHandle {
    /// Register `root` and every directory below it, skipping control and
    /// excluded directories (their whole subtree is pruned from the walk).
    ///
    /// Failures are logged and counted; they never abort the walk.
    pub fn register_tree(&mut self, root: &Path) -> RegistrationReport {
        let mut report = RegistrationReport::default();
        let control = &self.control;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !(entry.file_type().is_dir() && control.is_excluded_name(entry.file_name()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "failed to walk directory; continuing");
                    report.failed += 1;
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            if self.registered.contains(dir) {
                report.skipped += 1;
                continue;
            }

            match self.inner.watch(dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    self.registered.insert(dir.to_path_buf());
                    report.registered += 1;
                }
                Err(err) => {
                    warn!(?dir, error = %err, "failed to watch directory; continuing");
                    report.failed += 1;
                }
            }
        }

        debug!(
            ?root,
            registered = report.registered,
            skipped = report.skipped,
            failed = report.failed,
            "registered directory tree"
        );
        report
    }

    /// Register a directory that appeared while running.
    ///
    /// Anything previously recorded at or below `dir` belonged to a removed
    /// directory of the same name and is registered afresh.
    pub fn register_new_dir(&mut self, dir: &Path) -> RegistrationReport {
        self.forget_dir(dir);
        self.register_tree(dir)
    }

    /// Forget `dir` and everything recorded below it after it was removed.
    ///
    /// The OS drops its own watch with the directory; this only keeps the
    /// registered set bounded by the directories that currently exist.
    pub fn forget_dir(&mut self, dir: &Path) -> usize {
        let before = self.registered.len();
        self.registered.retain(|known| !known.starts_with(dir));
        let forgotten = before - self.registered.len();
        if forgotten > 0 {
            debug!(?dir, forgotten, "forgot removed directory");
        }
        forgotten
    }

    pub fn is_watching(&self, dir: &Path) -> bool {
        self.registered.contains(dir)
    }

    pub fn watched_count(&self) -> usize {
        self.registered.len()
    }
}
