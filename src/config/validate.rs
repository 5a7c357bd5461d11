// src/config/validate.rs

use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile, build_tasks};
use crate::dag::{ValidationOptions, validate};
use crate::errors::{DagrunError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DagrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_task_fields(cfg)?;
    validate_task_graph(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(DagrunError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_fields(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if task.cmd.trim().is_empty() {
            return Err(DagrunError::ConfigError(format!(
                "task '{}' has an empty `cmd`",
                name
            )));
        }
        if task.env.keys().any(|key| key.is_empty() || key.contains('=')) {
            return Err(DagrunError::ConfigError(format!(
                "task '{}' has an invalid `env` variable name",
                name
            )));
        }
    }
    Ok(())
}

/// Run the graph validator over the tasks the config describes.
///
/// Cycles are not rejected here: like any other task set, a cyclic config
/// runs until no task can become ready and then stops with a cycle error.
fn validate_task_graph(cfg: &RawConfigFile) -> Result<()> {
    // Bodies are never invoked during validation, so the base dir is irrelevant.
    let tasks = build_tasks(&cfg.config, &cfg.task, Path::new("."));
    let options = ValidationOptions {
        require_single_entry_point: cfg.config.require_single_entry_point,
    };
    validate(&tasks, &options)?;
    Ok(())
}
