// src/logging.rs

//! Logging setup for `dagrun` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection, first match wins:
//! 1. `--log-level` CLI flag
//! 2. `DAGRUN_LOG` environment variable, any `EnvFilter` directive
//!    (e.g. "debug" or "dagrun::dag=trace,info")
//! 3. `info`
//!
//! Logs go to STDERR; stdout carries the run summary and dry-run plan.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "DAGRUN_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => filter_from_env().unwrap_or_else(|| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// An unparsable `DAGRUN_LOG` is ignored rather than fatal.
fn filter_from_env() -> Option<EnvFilter> {
    let raw = std::env::var(LOG_ENV_VAR).ok()?;
    match EnvFilter::try_new(raw.trim()) {
        Ok(filter) => Some(filter),
        Err(e) => {
            eprintln!("ignoring invalid {LOG_ENV_VAR}={raw:?}: {e}");
            None
        }
    }
}
