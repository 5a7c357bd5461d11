// src/exec/mod.rs

//! Task body execution.
//!
//! - [`backend`] provides the `TaskBody` trait the scheduler calls into.
//! - [`layer`] launches one layer of bodies concurrently and waits for all
//!   of them.
//! - [`command`] is the body used by the CLI: a shell command run with
//!   `tokio::process::Command`.

pub mod backend;
pub mod command;
pub mod layer;

pub use backend::{BodyFuture, TaskBody};
pub use command::ShellCommand;
pub use layer::{CompletedTask, run_layer};
