//! Python sandbox: one interpreter process per execution.
//!
//! A fresh process per call gives each execution an isolated namespace, so
//! concurrently-running trajectories cannot observe each other's definitions
//! or imports.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{ExecutionReport, SandboxExecutor};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sandbox executor that runs code with `python3 -c`.
///
/// Infallible by contract: spawn failures, non-zero exits and timeouts are all
/// reported through [`ExecutionReport::status`].
pub struct PythonSandbox {
    interpreter: PathBuf,
    timeout: Duration,
}

impl PythonSandbox {
    /// Uses the given interpreter path.
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Finds `python3` (or `python`) on PATH. `None` when no interpreter is installed.
    pub fn discover() -> Option<Self> {
        which::which("python3")
            .or_else(|_| which::which("python"))
            .ok()
            .map(Self::new)
    }

    /// Wall-clock limit per execution; expiry is reported as a failure status (builder).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SandboxExecutor for PythonSandbox {
    async fn execute(&self, code: &str) -> ExecutionReport {
        let mut command = Command::new(&self.interpreter);
        command.arg("-c").arg(code).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => {
                return ExecutionReport::failed(format!(
                    "timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            }
            Ok(Err(e)) => return ExecutionReport::failed(format!("failed to start interpreter: {e}")),
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string();
        if output.status.success() {
            ExecutionReport::done(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // The last non-empty stderr line names the exception
            // (e.g. "ZeroDivisionError: division by zero").
            let status = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("execution failed")
                .trim()
                .to_string();
            ExecutionReport { result: stdout, status }
        }
    }
}
