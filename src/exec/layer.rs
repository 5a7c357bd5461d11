// src/exec/layer.rs

//! Concurrent execution of one scheduler layer.
//!
//! Every task of a layer is spawned as its own Tokio task at once (no pool,
//! no cap). The caller gets control back only after every spawned body has
//! finished, which is the layer barrier the scheduler relies on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::dag::{Task, TaskContext};
use crate::types::{TaskName, TaskOutcome};

/// A task body that has returned (or died) within a layer.
#[derive(Debug, Clone)]
pub struct CompletedTask {
    pub name: TaskName,
    pub outcome: TaskOutcome,
    /// Wall time spent inside the body. Zero when the body panicked.
    pub elapsed: Duration,
}

/// Internal handle for a body launched in the current layer.
struct LaunchedTask {
    name: TaskName,
    handle: JoinHandle<(TaskOutcome, Duration)>,
}

/// Launch every task in `batch` concurrently and wait for all of them.
///
/// A body that panics resolves its handle with a `JoinError`; that task is
/// recorded as `TaskOutcome::Failed(-1)` and its siblings are unaffected.
/// Results come back in launch order.
pub async fn run_layer(batch: Vec<(Task, TaskContext)>) -> Vec<CompletedTask> {
    let launched: Vec<LaunchedTask> = batch
        .into_iter()
        .map(|(task, ctx)| launch(&task, ctx))
        .collect();

    let mut completed = Vec::with_capacity(launched.len());

    for LaunchedTask { name, handle } in launched {
        let (outcome, elapsed) = match handle.await {
            Ok(result) => result,
            Err(err) => {
                error!(task = %name, error = %err, "task body panicked or was aborted");
                (TaskOutcome::Failed(-1), Duration::ZERO)
            }
        };

        debug!(task = %name, %outcome, ?elapsed, "task body returned");
        completed.push(CompletedTask {
            name,
            outcome,
            elapsed,
        });
    }

    completed
}

fn launch(task: &Task, ctx: TaskContext) -> LaunchedTask {
    let name = task.name().to_string();
    let body = Arc::clone(task.body());

    debug!(task = %name, layer = ctx.layer(), "launching task body");

    // The body is invoked inside the spawned task so that a panic while
    // building its future is isolated too.
    let handle = tokio::spawn(async move {
        let started = Instant::now();
        let outcome = body.run(ctx).await;
        (outcome, started.elapsed())
    });

    LaunchedTask { name, handle }
}
