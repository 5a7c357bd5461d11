// src/dag/validate.rs

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::dag::task::Task;
use crate::types::TaskName;

/// Structural problems that stop a run before any task starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate task name '{0}'")]
    DuplicateName(TaskName),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: TaskName, dependency: TaskName },

    #[error("no entry point: every task has at least one dependency")]
    NoEntryPoint,

    #[error("multiple entry points: {}", .0.join(", "))]
    MultipleEntryPoints(Vec<TaskName>),
}

/// Knobs for [`validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Require exactly one task without dependencies.
    ///
    /// Off by default: plenty of legitimate graphs have several independent
    /// roots. Turn it on to catch two root tasks that were meant to be
    /// connected.
    pub require_single_entry_point: bool,
}

impl ValidationOptions {
    pub fn single_entry_point() -> Self {
        Self {
            require_single_entry_point: true,
        }
    }
}

/// Check a task set for structural well-formedness.
///
/// Checks, in order, reporting the first problem found:
/// - every name is unique
/// - every dependency names a task in the set
/// - if requested, exactly one task has no dependencies
///
/// Cycles are not checked here; the scheduler detects them when a layer
/// comes up empty.
pub fn validate(tasks: &[Task], options: &ValidationOptions) -> Result<(), ValidationError> {
    let names = collect_unique_names(tasks)?;
    validate_dependencies(tasks, &names)?;

    if options.require_single_entry_point {
        validate_single_entry_point(tasks)?;
    }

    debug!(tasks = tasks.len(), ?options, "task graph validated");
    Ok(())
}

fn collect_unique_names(tasks: &[Task]) -> Result<HashSet<&str>, ValidationError> {
    let mut names = HashSet::with_capacity(tasks.len());

    for task in tasks {
        if !names.insert(task.name()) {
            return Err(ValidationError::DuplicateName(task.name().to_string()));
        }
    }

    Ok(names)
}

fn validate_dependencies(tasks: &[Task], names: &HashSet<&str>) -> Result<(), ValidationError> {
    for task in tasks {
        for dep in task.dependencies() {
            if !names.contains(dep.as_str()) {
                return Err(ValidationError::UnknownDependency {
                    task: task.name().to_string(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_single_entry_point(tasks: &[Task]) -> Result<(), ValidationError> {
    let entry_points: Vec<TaskName> = tasks
        .iter()
        .filter(|task| task.is_entry_point())
        .map(|task| task.name().to_string())
        .collect();

    match entry_points.len() {
        0 => Err(ValidationError::NoEntryPoint),
        1 => Ok(()),
        _ => Err(ValidationError::MultipleEntryPoints(entry_points)),
    }
}
