// src/exec/command.rs

//! Shell command task body.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::dag::TaskContext;
use crate::exec::backend::{BodyFuture, TaskBody};
use crate::types::TaskOutcome;

/// Runs a command line through the platform shell.
///
/// stdout lines are logged at `info`, stderr lines at `debug`. A non-zero
/// exit maps to `TaskOutcome::Failed(code)`; a process that cannot be
/// spawned or waited on maps to `Failed(-1)`.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    cmd: String,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
    skip_on_failed_dependency: bool,
}

impl ShellCommand {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            cwd: None,
            env: BTreeMap::new(),
            skip_on_failed_dependency: false,
        }
    }

    /// Working directory for the process.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Extra environment variables for the process.
    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Return `TaskOutcome::Skipped` without spawning anything when a direct
    /// dependency did not succeed.
    pub fn skip_on_failed_dependency(mut self, skip: bool) -> Self {
        self.skip_on_failed_dependency = skip;
        self
    }

    pub fn command_line(&self) -> &str {
        &self.cmd
    }
}

impl TaskBody for ShellCommand {
    fn run(&self, ctx: TaskContext) -> BodyFuture {
        // Owned copy so the future is 'static.
        let command = self.clone();
        Box::pin(async move { command.execute(ctx).await })
    }
}

impl ShellCommand {
    async fn execute(&self, ctx: TaskContext) -> TaskOutcome {
        if self.skip_on_failed_dependency && !ctx.all_dependencies_succeeded() {
            info!(
                task = %ctx.name(),
                failed_dependencies = ?ctx.unsuccessful_dependencies(),
                "dependency did not succeed; skipping command"
            );
            return TaskOutcome::Skipped;
        }

        match self.execute_inner(&ctx).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(task = %ctx.name(), error = %err, "task execution error");
                TaskOutcome::Failed(-1)
            }
        }
    }

    async fn execute_inner(&self, ctx: &TaskContext) -> Result<TaskOutcome> {
        info!(task = %ctx.name(), cmd = %self.cmd, "starting task process");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd.envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for task '{}'", ctx.name()))?;

        let stdout_reader = child.stdout.take().map(|stdout| {
            let task_name = ctx.name().to_string();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    info!(task = %task_name, "stdout: {}", line);
                }
            })
        });

        // Always consume stderr so buffers don't fill; log at debug.
        let stderr_reader = child.stderr.take().map(|stderr| {
            let task_name = ctx.name().to_string();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(task = %task_name, "stderr: {}", line);
                }
            })
        });

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for process of task '{}'", ctx.name()))?;

        // Drain remaining output before reporting completion.
        for reader in [stdout_reader, stderr_reader].into_iter().flatten() {
            if let Err(e) = reader.await {
                warn!(task = %ctx.name(), error = %e, "output reader ended abnormally");
            }
        }

        let code = status.code().unwrap_or(-1);
        let outcome = if status.success() {
            TaskOutcome::Success
        } else {
            TaskOutcome::Failed(code)
        };

        info!(
            task = %ctx.name(),
            exit_code = code,
            success = status.success(),
            "task process exited"
        );

        Ok(outcome)
    }
}
