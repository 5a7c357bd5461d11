// src/dag/plan.rs

//! Static layer planning: the scheduler's frontier algorithm without running
//! any task bodies. Used by `--dry-run`.

use crate::dag::state::RunState;
use crate::dag::task::Task;
use crate::dag::validate::{ValidationError, ValidationOptions, validate};
use crate::types::TaskName;

/// Layers a run would execute, plus the tasks it would never reach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerPlan {
    pub layers: Vec<Vec<TaskName>>,
    /// Tasks that never become ready because they sit on or behind a cycle.
    pub unplaceable: Vec<TaskName>,
}

impl LayerPlan {
    /// `true` if every task was placed in some layer.
    pub fn is_complete(&self) -> bool {
        self.unplaceable.is_empty()
    }
}

/// Compute the layers for a task set.
///
/// The set goes through the same validation as a real run first, so
/// `unplaceable` only ever holds tasks on or behind a cycle.
pub fn plan_layers(
    tasks: &[Task],
    options: &ValidationOptions,
) -> Result<LayerPlan, ValidationError> {
    validate(tasks, options)?;

    let mut state = RunState::new(tasks.iter().cloned());
    let mut layers = Vec::new();

    while !state.is_complete() {
        let frontier: Vec<TaskName> = state
            .ready_frontier()
            .iter()
            .map(|task| task.name().to_string())
            .collect();

        if frontier.is_empty() {
            break;
        }

        state.advance(frontier.iter().map(String::as_str));
        layers.push(frontier);
    }

    Ok(LayerPlan {
        layers,
        unplaceable: state.open_names(),
    })
}
