// src/dag/mod.rs

//! Task graph validation and layered scheduling.
//!
//! - [`task`] defines [`Task`] and the [`TaskContext`] handed to bodies.
//! - [`validate`] is the graph validator that runs before anything executes.
//! - [`state`] holds the per-run open/done bookkeeping.
//! - [`scheduler`] drives a run layer by layer.
//! - [`plan`] computes the same layers without executing anything.
//! - [`graph`] is an adjacency view used for diagnostics.

pub mod graph;
pub mod plan;
pub mod scheduler;
pub mod state;
pub mod task;
pub mod validate;

pub use graph::DagGraph;
pub use plan::{LayerPlan, plan_layers};
pub use scheduler::{LayeredScheduler, RunReport, ScheduleError, SchedulerOptions, TaskRecord};
pub use state::RunState;
pub use task::{Task, TaskContext};
pub use validate::{ValidationError, ValidationOptions, validate};
