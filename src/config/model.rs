// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dag::{SchedulerOptions, Task, ValidationOptions};
use crate::exec::ShellCommand;
use crate::types::TaskName;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// require_single_entry_point = true
///
/// [task.build]
/// cmd = "make"
///
/// [task.test]
/// cmd = "make test"
/// after = ["build"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<TaskName, TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Reject task sets that do not have exactly one task without `after`.
    #[serde(default)]
    pub require_single_entry_point: bool,

    /// Skip (rather than run) a task whose direct dependency did not succeed.
    /// The task is still scheduled and reported as `skipped`.
    #[serde(default)]
    pub skip_on_failed_dependency: bool,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// The command to execute through the shell.
    pub cmd: String,

    /// Dependency list: this task waits for all tasks listed here.
    #[serde(default)]
    pub after: Vec<TaskName>,

    /// Working directory, relative to the directory holding the config file.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Extra environment variables for the command.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// A validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holding one means the task graph passed the graph validator.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: ConfigSection,
    task: BTreeMap<TaskName, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<TaskName, TaskConfig>,
    ) -> Self {
        Self { config, task }
    }

    /// Turn on flags that were forced from the command line; a flag set in
    /// the file stays on.
    pub fn with_overrides(
        mut self,
        require_single_entry_point: bool,
        skip_on_failed_dependency: bool,
    ) -> Self {
        self.config.require_single_entry_point |= require_single_entry_point;
        self.config.skip_on_failed_dependency |= skip_on_failed_dependency;
        self
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    /// Task configs keyed by name.
    pub fn task_configs(&self) -> &BTreeMap<TaskName, TaskConfig> {
        &self.task
    }

    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            validation: ValidationOptions {
                require_single_entry_point: self.config.require_single_entry_point,
            },
        }
    }

    /// Build schedulable tasks; relative `cwd`s are resolved against `base_dir`.
    pub fn tasks(&self, base_dir: &Path) -> Vec<Task> {
        build_tasks(&self.config, &self.task, base_dir)
    }
}

pub(crate) fn build_tasks(
    section: &ConfigSection,
    tasks: &BTreeMap<TaskName, TaskConfig>,
    base_dir: &Path,
) -> Vec<Task> {
    tasks
        .iter()
        .map(|(name, tc)| {
            let cwd = match tc.cwd {
                Some(ref cwd) => base_dir.join(cwd),
                None => base_dir.to_path_buf(),
            };
            let body = ShellCommand::new(tc.cmd.clone())
                .cwd(cwd)
                .env(tc.env.clone())
                .skip_on_failed_dependency(section.skip_on_failed_dependency);

            Task::new(name.clone(), tc.after.iter().cloned(), body)
        })
        .collect()
}
