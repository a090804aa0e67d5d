// src/runner.rs

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::ProcessError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs one fully formed command line. Never retries.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<CommandOutput, ProcessError>;
}

/// Runs commands through the platform shell (`cmd /C` or `sh -c`).
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    deadline: Option<Duration>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and report a failure once `deadline` has passed.
    pub fn with_deadline(deadline: Option<Duration>) -> Self {
        ShellRunner { deadline }
    }

    #[cfg(windows)]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("cmd");
        // cmd.exe does its own parsing; pass the line through untouched
        cmd.arg("/C").raw_arg(command);
        cmd
    }

    #[cfg(not(windows))]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }

    async fn execute(&self, command: &str) -> Result<CommandOutput, ProcessError> {
        let mut cmd = Self::shell_command(command);
        cmd.kill_on_drop(true);

        let result = match self.deadline {
            Some(limit) => match timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ProcessError::TimedOut {
                        command: command.to_string(),
                        secs: limit.as_secs(),
                    })
                }
            },
            None => cmd.output().await,
        };

        let output = result.map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(ProcessError::ExitStatus {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, ProcessError> {
        self.execute(command).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let output = ShellRunner::new().run("echo hello").await.unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let err = ShellRunner::new()
            .run("echo broken >&2; exit 3")
            .await
            .unwrap_err();
        match err {
            ProcessError::ExitStatus { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn deadline_kills_long_running_commands() {
        let runner = ShellRunner::with_deadline(Some(Duration::from_millis(100)));
        let err = runner.run("sleep 5").await.unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut { .. }));
    }
}
