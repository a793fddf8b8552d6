use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Canonical project id type used throughout the watcher.
pub type ProjectId = String;

/// Minimum time between two accepted triggers for the same project.
pub const QUIET_WINDOW: Duration = Duration::from_secs(4);

/// Name of the tool's own per-project state directory (patches + log).
pub const VIBES_DIR: &str = ".vibes";

/// Version-control metadata directory.
pub const GIT_DIR: &str = ".git";

/// Directory names that are never watched, whatever the config says.
pub const CONTROL_DIRS: [&str; 2] = [VIBES_DIR, GIT_DIR];

/// Behaviour when a trigger is accepted for a project whose capture is still
/// running.
///
/// - `Queue`: remember one pending capture and start it as soon as the
///   running one finishes (default). Further triggers collapse into it.
/// - `Drop`: ignore the trigger; the running capture already covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusyBehaviour {
    #[default]
    Queue,
    Drop,
}

impl FromStr for BusyBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(BusyBehaviour::Queue),
            "drop" => Ok(BusyBehaviour::Drop),
            other => Err(format!(
                "invalid triggered_while_busy: {other} (expected \"queue\" or \"drop\")"
            )),
        }
    }
}
