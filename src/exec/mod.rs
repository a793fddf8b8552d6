// src/exec/mod.rs

//! Capture execution layer.
//!
//! - [`backend`] provides the `SnapshotTrigger` trait the runtime talks to.
//! - [`command`] is the production trigger, running an external command with
//!   `tokio::process::Command` in the project root.
//! - [`dispatch`] spawns each capture as its own task and reports completion
//!   back to the runtime via `RuntimeEvent`s.

pub mod backend;
pub mod command;
pub mod dispatch;

pub use backend::{CaptureFuture, SnapshotTrigger};
pub use command::CommandTrigger;
pub use dispatch::{run_capture, spawn_capture};
