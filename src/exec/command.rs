// src/exec/command.rs

//! Capture by running an external command (by default `vibe save ...`).

use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::CaptureSection;
use crate::engine::CaptureOutcome;
use crate::errors::Result;
use crate::exec::backend::{CaptureFuture, SnapshotTrigger};
use crate::registry::TrackedProject;

/// Runs `cmd args...` with the project root as working directory.
///
/// The command's stdout is inherited so its own messages reach the user;
/// stderr is forwarded to the log.
#[derive(Debug, Clone)]
pub struct CommandTrigger {
    cmd: String,
    args: Vec<String>,
}

impl CommandTrigger {
    pub fn new(cmd: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            cmd: cmd.into(),
            args,
        }
    }

    pub fn from_config(capture: &CaptureSection) -> Self {
        Self::new(capture.cmd.clone(), capture.args.clone())
    }

    /// Human-readable command line, for dry-run output.
    pub fn display(&self) -> String {
        let mut parts = vec![self.cmd.clone()];
        parts.extend(self.args.iter().map(|a| {
            if a.contains(' ') {
                format!("{a:?}")
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }

    async fn run(&self, project: &TrackedProject) -> Result<CaptureOutcome> {
        info!(
            project = %project.id,
            cmd = %self.display(),
            "starting capture command"
        );

        let mut child = Command::new(&self.cmd)
            .args(&self.args)
            .current_dir(&project.root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| {
                format!(
                    "spawning capture command '{}' for project '{}'",
                    self.cmd, project.id
                )
            })?;

        if let Some(stderr) = child.stderr.take() {
            let project_id = project.id.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!(project = %project_id, "capture stderr: {}", line);
                }
            });
        }

        let status = child.wait().await.with_context(|| {
            format!("waiting for capture command of project '{}'", project.id)
        })?;

        let code = status.code().unwrap_or(-1);
        info!(
            project = %project.id,
            exit_code = code,
            success = status.success(),
            "capture command exited"
        );

        Ok(if status.success() {
            CaptureOutcome::Success
        } else {
            CaptureOutcome::Failed(code)
        })
    }
}

impl SnapshotTrigger for CommandTrigger {
    fn capture<'a>(&'a self, project: &'a TrackedProject) -> CaptureFuture<'a> {
        Box::pin(self.run(project))
    }
}
