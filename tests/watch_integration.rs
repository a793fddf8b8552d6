// tests/watch_integration.rs
//
// Uses the real OS watcher on temporary directories.
#![cfg(unix)]

mod common;
use crate::common::fake_trigger::RecordingTrigger;
use crate::common::{init_tracing, wait_for_captures, with_timeout};

use std::error::Error;
use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::{tempdir, TempDir};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use vibewatch::engine::{Runtime, RuntimeEvent, WatchCore};
use vibewatch::registry::TrackedProject;
use vibewatch::types::BusyBehaviour;
use vibewatch::watch::{spawn_watcher, ControlDirs, WatchSet, WatcherHandle};

type TestResult = Result<(), Box<dyn Error>>;

const WINDOW: Duration = Duration::from_millis(50);

/// Let the OS deliver (or not deliver) pending events.
const SETTLE: Duration = Duration::from_millis(500);

fn project_dir() -> Result<(TempDir, PathBuf), Box<dyn Error>> {
    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join(".vibes/patches"))?;
    fs::create_dir_all(root.join(".git"))?;
    fs::create_dir_all(root.join("node_modules/pkg"))?;
    Ok((dir, root))
}

fn start_watching(
    root: &Path,
    source: WatcherHandle,
    trigger: RecordingTrigger,
    tx: mpsc::Sender<RuntimeEvent>,
    rx: mpsc::Receiver<RuntimeEvent>,
) -> tokio::task::JoinHandle<vibewatch::errors::Result<()>> {
    let watch_set = WatchSet::new(vec![TrackedProject::new("demo", root)]);
    let core = WatchCore::new(watch_set, ControlDirs::reserved(), WINDOW, BusyBehaviour::Queue);
    tokio::spawn(Runtime::new(core, rx, tx, trigger).with_source(source).run())
}

#[tokio::test]
async fn register_tree_skips_control_and_excluded_dirs() -> TestResult {
    init_tracing();
    let (_dir, root) = project_dir()?;

    let control = ControlDirs::with_patterns(&["node_modules".to_string()])?;
    let (tx, _rx) = mpsc::channel::<RuntimeEvent>(16);
    let mut source = spawn_watcher(control, tx)?;

    let report = source.register_tree(&root);
    assert_eq!(report.registered, 2, "root and src only: {report:?}");
    assert_eq!(report.failed, 0);
    assert!(source.is_watching(&root));
    assert!(source.is_watching(&root.join("src")));
    assert!(!source.is_watching(&root.join(".vibes")));
    assert!(!source.is_watching(&root.join(".vibes/patches")));
    assert!(!source.is_watching(&root.join(".git")));
    assert!(!source.is_watching(&root.join("node_modules/pkg")));

    // Registering the same tree again registers nothing new.
    let again = source.register_tree(&root);
    assert_eq!(again.registered, 0);
    assert_eq!(again.skipped, 2);
    assert_eq!(source.watched_count(), 2);
    Ok(())
}

#[tokio::test]
async fn writes_to_control_dirs_never_trigger_but_source_writes_do() -> TestResult {
    init_tracing();
    let (_dir, root) = project_dir()?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let trigger = RecordingTrigger::new(Arc::clone(&captured));

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(256);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx.clone())?;
    source.register_tree(&root);

    let watch_set = WatchSet::new(vec![TrackedProject::new("demo", &root)]);
    let core = WatchCore::new(watch_set, ControlDirs::reserved(), WINDOW, BusyBehaviour::Queue);
    let handle = tokio::spawn(Runtime::new(core, rx, tx.clone(), trigger).with_source(source).run());

    // The capture itself writes here; it must not feed back.
    fs::write(root.join(".vibes/log.json"), "[]")?;
    fs::write(root.join(".vibes/patches/1.patch"), "diff")?;
    fs::write(root.join(".git/index"), "idx")?;
    sleep(SETTLE).await;
    assert!(captured.lock().unwrap().is_empty());

    fs::write(root.join("src/main.rs"), "fn main() {}")?;
    let got = with_timeout(wait_for_captures(&captured, 1)).await;
    assert_eq!(got[0], "demo");

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn directories_created_while_running_are_watched() -> TestResult {
    init_tracing();
    let (_dir, root) = project_dir()?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let trigger = RecordingTrigger::new(Arc::clone(&captured));

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(256);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx.clone())?;
    source.register_tree(&root);

    let watch_set = WatchSet::new(vec![TrackedProject::new("demo", &root)]);
    let core = WatchCore::new(watch_set, ControlDirs::reserved(), WINDOW, BusyBehaviour::Queue);
    let handle = tokio::spawn(Runtime::new(core, rx, tx.clone(), trigger).with_source(source).run());

    fs::create_dir(root.join("feature"))?;
    with_timeout(wait_for_captures(&captured, 1)).await;
    sleep(SETTLE).await;

    fs::write(root.join("feature/new.rs"), "// new")?;
    let got = with_timeout(wait_for_captures(&captured, 2)).await;
    assert!(got.iter().all(|p| p == "demo"), "got {got:?}");

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn nested_projects_capture_the_innermost_only() -> TestResult {
    init_tracing();
    let (_dir, outer) = project_dir()?;
    let inner = outer.join("services/billing");
    fs::create_dir_all(&inner)?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let trigger = RecordingTrigger::new(Arc::clone(&captured));

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(256);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx.clone())?;
    source.register_tree(&outer);
    let nested = source.register_tree(&inner);
    assert_eq!(nested.registered, 0);
    assert_eq!(nested.skipped, 1);

    let watch_set = WatchSet::new(vec![
        TrackedProject::new("outer", &outer),
        TrackedProject::new("inner", &inner),
    ]);
    let core = WatchCore::new(watch_set, ControlDirs::reserved(), WINDOW, BusyBehaviour::Queue);
    let handle = tokio::spawn(Runtime::new(core, rx, tx.clone(), trigger).with_source(source).run());

    fs::write(inner.join("invoice.rs"), "// bill")?;
    with_timeout(wait_for_captures(&captured, 1)).await;
    sleep(SETTLE).await;
    let got = captured.lock().unwrap().clone();
    assert!(got.iter().all(|p| p == "inner"), "got {got:?}");

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn symlinked_directories_are_never_registered() -> TestResult {
    init_tracing();
    let base = tempdir()?;
    let base_path = base.path().canonicalize()?;
    let root = base_path.join("web");
    let outside = base_path.join("outside");
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(outside.join("deep"))?;

    let (tx, _rx) = mpsc::channel::<RuntimeEvent>(16);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx)?;
    source.register_tree(&root);
    let before = source.watched_count();

    symlink(&outside, root.join("link"))?;
    let report = source.register_new_dir(&root.join("link"));
    assert_eq!(report.registered, 0, "{report:?}");
    assert_eq!(source.watched_count(), before);
    assert!(!source.is_watching(&root.join("link")));
    assert!(!source.is_watching(&root.join("link/deep")));

    // Startup agrees: walking the root again does not enter the link.
    let again = source.register_tree(&root);
    assert_eq!(again.registered, 0);
    Ok(())
}

#[tokio::test]
async fn writes_behind_a_new_symlink_do_not_trigger() -> TestResult {
    init_tracing();
    let base = tempdir()?;
    let base_path = base.path().canonicalize()?;
    let root = base_path.join("web");
    let outside = base_path.join("outside");
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(outside.join("deep"))?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let trigger = RecordingTrigger::new(Arc::clone(&captured));
    let (tx, rx) = mpsc::channel::<RuntimeEvent>(256);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx.clone())?;
    source.register_tree(&root);
    let handle = start_watching(&root, source, trigger, tx.clone(), rx);

    // Creating the link is itself a change in the project.
    symlink(&outside, root.join("link"))?;
    with_timeout(wait_for_captures(&captured, 1)).await;
    sleep(SETTLE).await;
    let after_link = captured.lock().unwrap().len();

    fs::write(outside.join("deep/unrelated.txt"), "not ours")?;
    sleep(SETTLE).await;
    assert_eq!(captured.lock().unwrap().len(), after_link);

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn unreadable_directory_does_not_stop_registration() -> TestResult {
    init_tracing();
    let (_dir, root) = project_dir()?;
    let locked = root.join("locked");
    fs::create_dir_all(locked.join("inner"))?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Privileged users can read anything; there is nothing to fail then.
    let enforced = fs::read_dir(&locked).is_err();

    let captured = Arc::new(Mutex::new(Vec::new()));
    let trigger = RecordingTrigger::new(Arc::clone(&captured));
    let (tx, rx) = mpsc::channel::<RuntimeEvent>(256);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx.clone())?;

    let report = source.register_tree(&root);
    if enforced {
        assert!(report.failed >= 1, "{report:?}");
        assert!(!source.is_watching(&locked.join("inner")));
    }
    assert!(source.is_watching(&root));
    assert!(source.is_watching(&root.join("src")));

    let handle = start_watching(&root, source, trigger, tx.clone(), rx);
    fs::write(root.join("src/lib.rs"), "// still watched")?;
    let got = with_timeout(wait_for_captures(&captured, 1)).await;
    assert_eq!(got[0], "demo");

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[tokio::test]
async fn missing_root_is_reported_not_fatal() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let (tx, _rx) = mpsc::channel::<RuntimeEvent>(16);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx)?;

    let report = source.register_tree(&dir.path().join("gone"));
    assert_eq!(report.failed, 1);
    assert_eq!(report.registered, 0);
    assert_eq!(source.watched_count(), 0);
    Ok(())
}

#[tokio::test]
async fn removed_directories_are_forgotten() -> TestResult {
    init_tracing();
    let (_dir, root) = project_dir()?;
    fs::create_dir_all(root.join("tmp/a/b"))?;

    let (tx, _rx) = mpsc::channel::<RuntimeEvent>(16);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx)?;
    source.register_tree(&root);
    assert!(source.is_watching(&root.join("tmp/a/b")));
    let before = source.watched_count();

    fs::remove_dir_all(root.join("tmp"))?;
    assert_eq!(source.forget_dir(&root.join("tmp")), 3);
    assert_eq!(source.watched_count(), before - 3);
    assert!(source.is_watching(&root.join("src")));

    // Forgetting a file path or an unknown path changes nothing.
    assert_eq!(source.forget_dir(&root.join("src/main.rs")), 0);
    Ok(())
}

#[tokio::test]
async fn runtime_forgets_directories_deleted_while_running() -> TestResult {
    init_tracing();
    let (_dir, root) = project_dir()?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let trigger = RecordingTrigger::new(Arc::clone(&captured));
    let (tx, rx) = mpsc::channel::<RuntimeEvent>(256);
    let mut source = spawn_watcher(ControlDirs::reserved(), tx.clone())?;
    source.register_tree(&root);
    let handle = start_watching(&root, source, trigger, tx.clone(), rx);

    // Churn through uniquely named directories, then make sure the watcher
    // still works on the surviving tree.
    for i in 0..5 {
        let scratch = root.join(format!("scratch-{i}"));
        fs::create_dir(&scratch)?;
        sleep(Duration::from_millis(100)).await;
        fs::remove_dir(&scratch)?;
    }
    sleep(SETTLE).await;
    let before = captured.lock().unwrap().len();

    fs::write(root.join("src/main.rs"), "fn main() {}")?;
    let got = with_timeout(wait_for_captures(&captured, before + 1)).await;
    assert!(got.iter().all(|p| p == "demo"), "got {got:?}");

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}
