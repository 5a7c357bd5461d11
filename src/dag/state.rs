// src/dag/state.rs

//! Per-run bookkeeping: which tasks are still open and which are done.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::dag::task::Task;
use crate::types::TaskName;

/// Open/done sets for a single run.
///
/// Built fresh for every run and owned by the driving loop, so separate runs
/// never share completion state. It is only mutated between layers.
///
/// Invariant: every task is in exactly one of `open` or `done`.
#[derive(Debug)]
pub struct RunState {
    open: BTreeMap<TaskName, Task>,
    done: BTreeSet<TaskName>,
}

impl RunState {
    /// Start a run with every task open.
    ///
    /// Assumes names are unique (see [`validate`](crate::dag::validate)); a
    /// repeated name replaces the earlier task.
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Self {
        let open = tasks
            .into_iter()
            .map(|task| (task.name().to_string(), task))
            .collect();

        Self {
            open,
            done: BTreeSet::new(),
        }
    }

    /// `true` once every task has been moved to `done`.
    pub fn is_complete(&self) -> bool {
        self.open.is_empty()
    }

    pub fn is_done(&self, name: &str) -> bool {
        self.done.contains(name)
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    pub fn done_len(&self) -> usize {
        self.done.len()
    }

    /// Names of the tasks that have not finished, sorted.
    pub fn open_names(&self) -> Vec<TaskName> {
        self.open.keys().cloned().collect()
    }

    /// Every open task whose dependencies are all done.
    ///
    /// An empty frontier while tasks are still open means no further progress
    /// is possible: the remaining tasks sit on or behind a cycle.
    pub fn ready_frontier(&self) -> Vec<Task> {
        let frontier: Vec<Task> = self
            .open
            .values()
            .filter(|task| self.deps_satisfied(task))
            .cloned()
            .collect();

        debug!(
            ready = frontier.len(),
            open = self.open.len(),
            done = self.done.len(),
            "computed ready frontier"
        );
        frontier
    }

    /// Move finished tasks from `open` to `done`.
    ///
    /// Completion is recorded whatever the body reported.
    pub fn advance<'a>(&mut self, finished: impl IntoIterator<Item = &'a str>) {
        for name in finished {
            match self.open.remove(name) {
                Some(_) => {
                    self.done.insert(name.to_string());
                }
                None => {
                    warn!(task = %name, "advance for a task that is not open; ignoring");
                }
            }
        }
    }

    fn deps_satisfied(&self, task: &Task) -> bool {
        task.dependencies().iter().all(|dep| self.done.contains(dep))
    }
}
