// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `vibe-watch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vibe-watch",
    version,
    about = "Watch tracked projects and auto-save a vibe after each burst of edits.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project registry (JSON).
    ///
    /// Default: `~/.vibe/tracked.json`.
    #[arg(long, value_name = "PATH", global = true)]
    pub registry: Option<PathBuf>,

    /// Path to the watcher config file (TOML).
    ///
    /// Default: `~/.vibe/watch.toml`. A missing file means built-in defaults.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `VIBEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch tracked projects and auto-save on change.
    Watch {
        /// Only watch the project with this id.
        #[arg(value_name = "PROJECT")]
        project: Option<String>,

        /// Resolve registry + config and print what would be watched, then exit.
        #[arg(long)]
        dry_run: bool,
    },

    /// Register a directory as a tracked project.
    Track {
        /// Project directory. Defaults to the current directory.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Project id. Defaults to the directory name.
        #[arg(long, value_name = "ID")]
        id: Option<String>,
    },

    /// Stop tracking a project.
    Untrack {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List tracked projects.
    Projects,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
