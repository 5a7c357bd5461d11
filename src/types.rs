// src/types.rs

//! Small shared types used across the scheduler, executor and config layers.

use std::fmt;

/// Task names are plain strings, unique within a single run.
pub type TaskName = String;

/// What a task body reported when it finished.
///
/// The scheduler records this but never uses it for sequencing: a task whose
/// dependency failed still runs, and it is up to the body to decide whether
/// to do real work or return [`TaskOutcome::Skipped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    /// Exit code, or `-1` when the body could not run at all (spawn error, panic).
    Failed(i32),
    /// The body chose not to run, e.g. because a dependency did not succeed.
    Skipped,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success)
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Success => write!(f, "ok"),
            TaskOutcome::Failed(code) => write!(f, "failed (exit code {code})"),
            TaskOutcome::Skipped => write!(f, "skipped"),
        }
    }
}
