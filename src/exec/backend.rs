// src/exec/backend.rs

//! Pluggable task body abstraction.
//!
//! The scheduler never knows what a task actually does. It hands each ready
//! task a [`TaskContext`] and awaits the future returned by its
//! [`TaskBody`]. Production code uses [`ShellCommand`](super::ShellCommand);
//! tests and library users can pass any async closure.

use std::future::Future;
use std::pin::Pin;

use crate::dag::TaskContext;
use crate::types::TaskOutcome;

/// Boxed future returned by a task body.
///
/// It must be `'static` because every body in a layer is spawned onto the
/// Tokio runtime as its own task.
pub type BodyFuture = Pin<Box<dyn Future<Output = TaskOutcome> + Send + 'static>>;

/// Trait abstracting how a single task is executed.
pub trait TaskBody: Send + Sync {
    /// Start the task. The scheduler awaits the returned future and records
    /// its outcome; it does not look at the outcome when deciding what runs
    /// next.
    fn run(&self, ctx: TaskContext) -> BodyFuture;
}

impl<F, Fut> TaskBody for F
where
    F: Fn(TaskContext) -> Fut + Send + Sync,
    Fut: Future<Output = TaskOutcome> + Send + 'static,
{
    fn run(&self, ctx: TaskContext) -> BodyFuture {
        Box::pin(self(ctx))
    }
}
