// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::{default_config_path, load_or_default, ConfigFile};
use crate::engine::{Runtime, RuntimeEvent, WatchCore};
use crate::exec::CommandTrigger;
use crate::registry::{
    default_registry_path, JsonRegistryStore, RegistryStore, TrackOutcome, TrackedProject,
};
use crate::types::{CONTROL_DIRS, QUIET_WINDOW};
use crate::watch::{spawn_watcher, ControlDirs, WatchSet};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let store = JsonRegistryStore::new(registry_path(&args)?);

    match args.command {
        Command::Watch { ref project, dry_run } => {
            let cfg = load_or_default(config_path(&args)?)?;
            run_watch(&store, &cfg, project.as_deref(), dry_run).await
        }
        Command::Track { ref path, ref id } => run_track(&store, path.as_deref(), id.clone()),
        Command::Untrack { ref id } => run_untrack(&store, id),
        Command::Projects => run_projects(&store),
    }
}

fn registry_path(args: &CliArgs) -> Result<PathBuf> {
    match &args.registry {
        Some(path) => Ok(path.clone()),
        None => Ok(default_registry_path()?),
    }
}

fn config_path(args: &CliArgs) -> Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => Ok(default_config_path()?),
    }
}

/// `watch [PROJECT]`: load the registry once, register every project tree
/// with the OS watcher, then run the event loop until Ctrl-C.
///
/// Everything that can fail fatally (registry, filter, config, watcher
/// creation) fails before the first directory is registered.
pub async fn run_watch(
    store: &dyn RegistryStore,
    cfg: &ConfigFile,
    filter: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let registry = store.load()?;
    let watch_set = canonical_watch_set(registry.select(filter)?);
    let control = ControlDirs::with_patterns(&cfg.watch.exclude)?;
    let trigger = CommandTrigger::from_config(&cfg.capture);

    if dry_run {
        print_dry_run(&watch_set, &control, &trigger, cfg);
        return Ok(());
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(256);

    let mut source = spawn_watcher(control.clone(), rt_tx.clone())?;

    for project in watch_set.projects() {
        println!("[VIBE] 👁️ Watching '{}': {}", project.id, project.root.display());
        let report = source.register_tree(&project.root);
        if report.registered == 0 && report.skipped == 0 {
            warn!(
                project = %project.id,
                root = ?project.root,
                "no directory of this project could be watched"
            );
        }
        info!(
            project = %project.id,
            registered = report.registered,
            failed = report.failed,
            "project registered with file watcher"
        );
    }

    // Ctrl-C → stop the loop; dropping the runtime releases the OS watches.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let core = WatchCore::new(
        watch_set,
        control,
        QUIET_WINDOW,
        cfg.config.triggered_while_busy,
    );

    let runtime = Runtime::new(core, rt_rx, rt_tx, trigger).with_source(source);
    runtime.run().await?;
    Ok(())
}

/// Event paths come back from the OS in canonical form (e.g. `/private/var`
/// on macOS), so roots are canonicalised too. Roots that no longer exist are
/// kept as-is; registering them will fail and be logged.
fn canonical_watch_set(watch_set: WatchSet) -> WatchSet {
    let projects = watch_set
        .projects()
        .iter()
        .map(|p| match p.root.canonicalize() {
            Ok(root) => TrackedProject::new(p.id.clone(), root),
            Err(err) => {
                debug!(project = %p.id, error = %err, "could not canonicalize project root");
                p.clone()
            }
        })
        .collect();
    WatchSet::new(projects)
}

/// `track [PATH] [--id ID]`.
pub fn run_track(store: &dyn RegistryStore, path: Option<&Path>, id: Option<String>) -> Result<()> {
    let dir = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let root = dir
        .canonicalize()
        .map_err(|e| errors::VibeError::RegistryError(format!("cannot track {:?}: {}", dir, e)))?;
    if !root.is_dir() {
        return Err(errors::VibeError::RegistryError(format!(
            "cannot track {:?}: not a directory",
            root
        ))
        .into());
    }

    let mut registry = store.load()?;
    match registry.track(root, id)? {
        TrackOutcome::Added(project) => {
            store.save(&registry)?;
            println!(
                "[VIBE] 📍 Tracking '{}': {}",
                project.id,
                project.root.display()
            );
        }
        TrackOutcome::AlreadyTracked(project) => {
            println!(
                "[VIBE] 📍 Already tracked as '{}': {}",
                project.id,
                project.root.display()
            );
        }
    }
    Ok(())
}

/// `untrack ID`.
pub fn run_untrack(store: &dyn RegistryStore, id: &str) -> Result<()> {
    let mut registry = store.load()?;
    let removed = registry.untrack(id)?;
    store.save(&registry)?;
    println!(
        "[VIBE] 🧹 Stopped tracking '{}': {}",
        removed.id,
        removed.root.display()
    );
    Ok(())
}

/// `projects`.
pub fn run_projects(store: &dyn RegistryStore) -> Result<()> {
    let registry = store.load()?;
    if registry.is_empty() {
        println!("[VIBE] No tracked projects. Use `vibe-watch track` to add one.");
        return Ok(());
    }

    println!("[VIBE] --- TRACKED PROJECTS ---");
    for project in &registry.projects {
        println!("{} | {}", project.id, project.root.display());
    }
    println!("[VIBE] ------------------------");
    Ok(())
}

/// Simple dry-run output: what would be watched and what would run.
fn print_dry_run(
    watch_set: &WatchSet,
    control: &ControlDirs,
    trigger: &CommandTrigger,
    cfg: &ConfigFile,
) {
    println!("vibe-watch dry-run");
    println!("  quiet_window = {}s", QUIET_WINDOW.as_secs());
    println!(
        "  config.triggered_while_busy = {:?}",
        cfg.config.triggered_while_busy
    );
    println!("  capture = {}", trigger.display());
    println!("  excluded dirs = {:?} + {:?}", CONTROL_DIRS, control.patterns());
    println!();

    println!("projects ({}):", watch_set.len());
    for project in watch_set.projects() {
        println!("  - {}: {}", project.id, project.root.display());
    }

    debug!("dry-run complete (no watching)");
}
