// src/errors.rs

//! Crate-wide error type for the application layer (config + CLI).
//!
//! The scheduler core has its own errors ([`ValidationError`],
//! [`ScheduleError`]); they are wrapped here so `load_and_validate` and
//! `run` can return a single type.

use std::path::PathBuf;

use thiserror::Error;

use crate::dag::{ScheduleError, ValidationError};

#[derive(Error, Debug)]
pub enum DagrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error reading {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid task graph: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type Result<T> = std::result::Result<T, DagrunError>;
