// src/dag/scheduler.rs

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::dag::state::RunState;
use crate::dag::task::{Task, TaskContext};
use crate::dag::validate::{ValidationError, ValidationOptions, validate};
use crate::exec::layer::{CompletedTask, run_layer};
use crate::types::{TaskName, TaskOutcome};

/// Options for a [`LayeredScheduler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub validation: ValidationOptions,
}

/// What happened to one task in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRecord {
    pub outcome: TaskOutcome,
    /// Zero-based layer the task ran in.
    pub layer: usize,
    pub elapsed: Duration,
}

/// Everything a run attempted: the layers in execution order and one record
/// per attempted task.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    layers: Vec<Vec<TaskName>>,
    tasks: BTreeMap<TaskName, TaskRecord>,
}

impl RunReport {
    /// Layers in execution order; names within a layer are sorted.
    pub fn layers(&self) -> &[Vec<TaskName>] {
        &self.layers
    }

    pub fn record_of(&self, name: &str) -> Option<&TaskRecord> {
        self.tasks.get(name)
    }

    pub fn outcome_of(&self, name: &str) -> Option<TaskOutcome> {
        self.tasks.get(name).map(|record| record.outcome)
    }

    /// All records, sorted by task name.
    pub fn records(&self) -> impl Iterator<Item = (&str, &TaskRecord)> {
        self.tasks.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Number of tasks whose body was invoked.
    pub fn attempted(&self) -> usize {
        self.tasks.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.tasks.values().all(|record| record.outcome.is_success())
    }

    /// Tasks that failed or skipped themselves, sorted by name.
    pub fn unsuccessful(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|(_, record)| !record.outcome.is_success())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn context_for(&self, task: &Task, layer: usize) -> TaskContext {
        let dependency_outcomes = task
            .dependencies()
            .iter()
            .filter_map(|dep| self.outcome_of(dep).map(|outcome| (dep.clone(), outcome)))
            .collect();

        TaskContext::new(task.name(), layer, dependency_outcomes)
    }

    fn record_layer(&mut self, layer: usize, completed: Vec<CompletedTask>) {
        let mut names = Vec::with_capacity(completed.len());

        for CompletedTask {
            name,
            outcome,
            elapsed,
        } in completed
        {
            if !outcome.is_success() {
                warn!(task = %name, layer, %outcome, "task did not succeed; dependents still run");
            }
            self.tasks.insert(
                name.clone(),
                TaskRecord {
                    outcome,
                    layer,
                    elapsed,
                },
            );
            names.push(name);
        }

        names.sort();
        self.layers.push(names);
    }
}

/// Fatal scheduling errors. A failing task body is never one of these.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Tasks remained but none of them could become ready.
    ///
    /// `unrun` holds every task that was never attempted (the cyclic tasks
    /// and anything depending on them); `report` holds what ran before the
    /// stop.
    #[error("cycle detected: {} task(s) never became ready: {}", .unrun.len(), .unrun.join(", "))]
    CycleDetected {
        unrun: Vec<TaskName>,
        report: RunReport,
    },
}

/// Runs a task set layer by layer.
///
/// Each layer is the set of tasks whose dependencies have all finished. All
/// tasks of a layer run concurrently and the next layer starts only after
/// every one of them has returned. A task's outcome never changes what runs
/// next: dependents of a failed task still run.
///
/// The scheduler holds no per-run state, so one instance can drive several
/// runs, even at the same time.
#[derive(Debug, Clone, Default)]
pub struct LayeredScheduler {
    options: SchedulerOptions,
}

impl LayeredScheduler {
    pub fn new(options: SchedulerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    /// Validate `tasks` and execute every one of them exactly once.
    ///
    /// Returns the report once every task has been attempted. Fails before
    /// running anything if validation fails, or at a layer boundary if no
    /// remaining task can become ready.
    pub async fn run(&self, tasks: Vec<Task>) -> Result<RunReport, ScheduleError> {
        validate(&tasks, &self.options.validation)?;

        let total = tasks.len();
        let mut state = RunState::new(tasks);
        let mut report = RunReport::default();

        info!(tasks = total, "scheduler: starting run");

        while !state.is_complete() {
            let frontier = state.ready_frontier();

            if frontier.is_empty() {
                let unrun = state.open_names();
                warn!(?unrun, "scheduler: no task can become ready; cycle detected");
                return Err(ScheduleError::CycleDetected { unrun, report });
            }

            let layer = report.layers.len();
            let names: Vec<&str> = frontier.iter().map(Task::name).collect();
            info!(layer, tasks = ?names, "scheduler: launching layer");

            let batch = frontier
                .into_iter()
                .map(|task| {
                    let ctx = report.context_for(&task, layer);
                    (task, ctx)
                })
                .collect();

            let completed = run_layer(batch).await;

            state.advance(completed.iter().map(|c| c.name.as_str()));
            report.record_layer(layer, completed);

            info!(
                layer,
                remaining = state.open_len(),
                "scheduler: layer finished"
            );
        }

        info!(
            layers = report.layers.len(),
            attempted = report.attempted(),
            succeeded = report.all_succeeded(),
            "scheduler: run complete"
        );
        Ok(report)
    }
}
