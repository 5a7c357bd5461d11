// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DagrunError, Result};

/// Config file looked up when `--config` is not given, relative to the
/// current working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Dagrun.toml";

/// Load a configuration file from a given path and return the raw config.
///
/// This only performs TOML deserialization; it does **not** validate the
/// task graph. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| DagrunError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` defaults).
/// - Checks for:
///   - at least one task and non-empty commands,
///   - unknown `after` references,
///   - the single-entry-point rule, when enabled.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(&path)?;
    ConfigFile::try_from(raw)
}
