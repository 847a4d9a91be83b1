//! Process runner: executes one external command under a hard deadline.
//!
//! Shared by cover extraction and conversion. A non-zero exit is data,
//! not an error; only a genuine launch failure (binary missing,
//! permission denied) surfaces as `Err`. On deadline expiry the child is
//! force-killed and the outcome carries `timed_out = true` with no
//! assumption that partial output is valid.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::error::{excerpt, ConverterError};

/// A command to execute: program plus ordered argument vector.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Structured outcome of one external process invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Exit code, if the process exited normally. `None` on timeout or
    /// signal death.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Whether the deadline fired and the process was killed.
    pub timed_out: bool,
}

impl ProcessOutcome {
    /// Whether the process completed with exit code zero.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Bounded stderr excerpt for logging.
    pub fn stderr_excerpt(&self) -> String {
        excerpt(&self.stderr, 1000)
    }
}

/// Runs a command to completion, buffering stdout/stderr fully.
///
/// Blocks the caller until the process exits or `deadline` fires.
/// `kill_on_drop` guarantees the child does not outlive an expired
/// deadline.
pub async fn run_command(
    spec: &CommandSpec,
    deadline: Duration,
) -> Result<ProcessOutcome, ConverterError> {
    debug!(
        program = %spec.program.display(),
        args = %spec.args.join(" "),
        "executing external command"
    );

    let child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ConverterError::LaunchFailed {
            program: spec.program.clone(),
            source,
        })?;

    match timeout(deadline, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(ProcessOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            timed_out: false,
        }),
        Ok(Err(e)) => Err(ConverterError::Io(e)),
        Err(_) => {
            // Dropping the wait future drops the child, which kills it.
            warn!(
                program = %spec.program.display(),
                timeout_secs = deadline.as_secs(),
                "external command exceeded deadline, killed"
            );
            Ok(ProcessOutcome {
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                timed_out: true,
            })
        }
    }
}
