//! Shell command execution
//!
//! Commands arrive as untrusted text and run through the host shell. Both
//! output streams are captured regardless of exit status so handlers can
//! forward them verbatim; a non-zero exit is signal for the peer, not an
//! error here.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use wr_core::ExecError;

/// Captured output of one command invocation, consumed immediately by the
/// handler to build a response payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
}

/// Runs shell commands on behalf of connection handlers
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    /// Kill the child and report an error once this elapses; unbounded when
    /// unset, which leaves a hung command blocking its handler
    timeout: Option<Duration>,
}

impl CommandExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `command` through the host shell, capturing stdout and stderr as
    /// (lossy) text.
    ///
    /// Errors are limited to an empty command, a shell that cannot be
    /// launched, and the configured timeout; callers convert them into
    /// response text rather than letting them end the connection.
    pub async fn execute(&self, command: &str) -> Result<ExecutionResult, ExecError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(ExecError::Empty);
        }

        let mut shell = shell_command(command);
        shell
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            // kill_on_drop reaps the child when the timed-out future is dropped
            Some(limit) => tokio::time::timeout(limit, shell.output())
                .await
                .map_err(|_| ExecError::TimedOut { limit })??,
            None => shell.output().await?,
        };

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
