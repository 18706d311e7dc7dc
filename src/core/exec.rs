//! Running approved code and other child processes.

use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' did not finish within {}s", .limit.as_secs())]
    TimedOut { program: String, limit: Duration },
    #[error("no command configured")]
    EmptyCommand,
}

/// Captured result of a finished code run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl From<Output> for ExecutionOutcome {
    fn from(output: Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, code: &str) -> Result<ExecutionOutcome, ProcessError>;
}

/// Hands code to an interpreter as a single argument, e.g. `python3 -c <code>`.
#[derive(Debug, Clone)]
pub struct SubprocessExecutor {
    interpreter: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl SubprocessExecutor {
    pub fn new(interpreter: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            interpreter: interpreter.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl CodeExecutor for SubprocessExecutor {
    async fn execute(&self, code: &str) -> Result<ExecutionOutcome, ProcessError> {
        info!(interpreter = %self.interpreter, bytes = code.len(), "executing approved code");
        let mut command = Command::new(&self.interpreter);
        command.args(&self.args).arg(code);
        let output = capture_output(&mut command, &self.interpreter, self.timeout).await?;
        Ok(ExecutionOutcome::from(output))
    }
}

/// Runs `command` to completion with captured stdout/stderr, killing it if
/// `limit` elapses first.
pub(crate) async fn capture_output(
    command: &mut Command,
    program: &str,
    limit: Option<Duration>,
) -> Result<Output, ProcessError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = command.spawn().map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;
    let waiting = child.wait_with_output();
    let result = match limit {
        Some(limit) => tokio::time::timeout(limit, waiting)
            .await
            .map_err(|_| ProcessError::TimedOut {
                program: program.to_string(),
                limit,
            })?,
        None => waiting.await,
    };
    let output = result.map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;
    debug!(program, status = ?output.status, "child process finished");
    Ok(output)
}
