// tests/command_trigger.rs
#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::fs;

use tempfile::tempdir;

use vibewatch::config::CaptureSection;
use vibewatch::engine::CaptureOutcome;
use vibewatch::exec::{run_capture, CommandTrigger, SnapshotTrigger};
use vibewatch::registry::TrackedProject;

fn sh(script: &str) -> CommandTrigger {
    CommandTrigger::new("sh", vec!["-c".to_string(), script.to_string()])
}

#[tokio::test]
async fn command_runs_in_the_project_root() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempdir()?;
    let project = TrackedProject::new("demo", dir.path());

    let outcome = sh("echo saved > marker.txt").capture(&project).await?;

    assert_eq!(outcome, CaptureOutcome::Success);
    assert_eq!(fs::read_to_string(dir.path().join("marker.txt"))?.trim(), "saved");
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_a_failed_outcome() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempdir()?;
    let project = TrackedProject::new("demo", dir.path());

    let outcome = sh("echo nope >&2; exit 3").capture(&project).await?;
    assert_eq!(outcome, CaptureOutcome::Failed(3));
    assert!(!outcome.is_success());
    Ok(())
}

#[tokio::test]
async fn missing_program_is_an_error_and_maps_to_failure() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempdir()?;
    let project = TrackedProject::new("demo", dir.path());
    let trigger = CommandTrigger::new("definitely-not-a-real-vibe-binary", Vec::new());

    assert!(trigger.capture(&project).await.is_err());
    assert_eq!(run_capture(&trigger, &project).await, CaptureOutcome::Failed(-1));
    Ok(())
}

#[test]
fn display_quotes_arguments_with_spaces() {
    let trigger = CommandTrigger::from_config(&CaptureSection::default());
    assert_eq!(trigger.display(), "vibe save \"Auto-save: file change\"");
}
