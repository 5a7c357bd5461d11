// src/dag/task.rs

//! Task definition and the context handed to a task body when it starts.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::exec::TaskBody;
use crate::types::{TaskName, TaskOutcome};

/// One unit of work: a unique name, the names it waits for, and an opaque body.
///
/// Cloning a task is cheap; the body is shared behind an `Arc`.
#[derive(Clone)]
pub struct Task {
    name: TaskName,
    dependencies: BTreeSet<TaskName>,
    body: Arc<dyn TaskBody>,
}

impl Task {
    /// Build a task from any [`TaskBody`], including async closures:
    ///
    /// ```
    /// use dagrun::dag::{Task, TaskContext};
    /// use dagrun::types::TaskOutcome;
    ///
    /// let task = Task::new("build", ["fetch"], |_ctx: TaskContext| async {
    ///     TaskOutcome::Success
    /// });
    /// assert_eq!(task.name(), "build");
    /// assert!(task.dependencies().contains("fetch"));
    /// ```
    pub fn new<I, S>(
        name: impl Into<TaskName>,
        dependencies: I,
        body: impl TaskBody + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        Self::with_shared_body(name, dependencies, Arc::new(body))
    }

    /// Like [`Task::new`], for a body that is already shared.
    pub fn with_shared_body<I, S>(
        name: impl Into<TaskName>,
        dependencies: I,
        body: Arc<dyn TaskBody>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the tasks that must finish before this one may start.
    pub fn dependencies(&self) -> &BTreeSet<TaskName> {
        &self.dependencies
    }

    /// A task with no dependencies can run in the first layer.
    pub fn is_entry_point(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub(crate) fn body(&self) -> &Arc<dyn TaskBody> {
        &self.body
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// What a body learns about its run when it is launched.
///
/// The outcomes of direct dependencies are included so a body can implement
/// fail-fast on its own (see `ShellCommand::skip_on_failed_dependency`); the
/// scheduler itself never skips anything.
#[derive(Debug, Clone)]
pub struct TaskContext {
    name: TaskName,
    layer: usize,
    dependency_outcomes: BTreeMap<TaskName, TaskOutcome>,
}

impl TaskContext {
    pub fn new(
        name: impl Into<TaskName>,
        layer: usize,
        dependency_outcomes: BTreeMap<TaskName, TaskOutcome>,
    ) -> Self {
        Self {
            name: name.into(),
            layer,
            dependency_outcomes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based index of the layer this task runs in.
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn dependency_outcomes(&self) -> &BTreeMap<TaskName, TaskOutcome> {
        &self.dependency_outcomes
    }

    /// Direct dependencies whose outcome was anything but success.
    pub fn unsuccessful_dependencies(&self) -> Vec<&str> {
        self.dependency_outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn all_dependencies_succeeded(&self) -> bool {
        self.dependency_outcomes.values().all(TaskOutcome::is_success)
    }
}
