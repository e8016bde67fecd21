//! Shell executors
//!
//! A [`Shell`] is the only way a provider reaches the outside world. It
//! runs one command at a time and reports whether it succeeded; output is
//! passed through to the terminal and never parsed.

use crate::command::ShellCommand;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use tokio::process::Command;

/// Command executor supplied by the host
#[async_trait]
pub trait Shell: Send + Sync {
    /// Run a command to completion
    ///
    /// Returns `Ok(false)` when the command exits non-zero and `Err` when
    /// it could not be run at all.
    async fn run(&self, command: &ShellCommand) -> std::io::Result<bool>;
}

/// Runs commands through `sh -c`
#[derive(Debug, Clone, Default)]
pub struct ProcessShell {
    timeout: Option<Duration>,
}

impl ProcessShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any command that runs longer than `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

#[async_trait]
impl Shell for ProcessShell {
    async fn run(&self, command: &ShellCommand) -> std::io::Result<bool> {
        let line = command.to_string();
        tracing::debug!("Running: {}", line);

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&line)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let status = match self.timeout {
            None => child.wait().await?,
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!(
                            "{} timed out after {}s",
                            command.program_name(),
                            timeout.as_secs()
                        ),
                    ));
                }
            },
        };

        if !status.success() {
            tracing::debug!("{} exited with {}", command.program_name(), status);
        }
        Ok(status.success())
    }
}

/// Prints commands instead of running them
#[derive(Debug, Default)]
pub struct DryRunShell {
    commands: Mutex<Vec<String>>,
}

impl DryRunShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered commands seen so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Shell for DryRunShell {
    async fn run(&self, command: &ShellCommand) -> std::io::Result<bool> {
        let line = command.to_string();
        println!("{}", line);
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
        Ok(true)
    }
}

/// Test double that records commands and fails the ones matching a pattern
#[cfg(feature = "testing")]
#[derive(Debug, Default)]
pub struct ScriptedShell {
    commands: Mutex<Vec<ShellCommand>>,
    fail_on: Vec<String>,
    error_on: Vec<String>,
}

#[cfg(feature = "testing")]
impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a non-zero exit for commands whose rendering contains `pattern`
    pub fn fail_on(mut self, pattern: impl Into<String>) -> Self {
        self.fail_on.push(pattern.into());
        self
    }

    /// Report a spawn error for commands whose rendering contains `pattern`
    pub fn error_on(mut self, pattern: impl Into<String>) -> Self {
        self.error_on.push(pattern.into());
        self
    }

    pub fn commands(&self) -> Vec<ShellCommand> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Rendered command lines, in order
    pub fn lines(&self) -> Vec<String> {
        self.commands().iter().map(ToString::to_string).collect()
    }

    /// Whether any command line contains `pattern`
    pub fn ran(&self, pattern: &str) -> bool {
        self.lines().iter().any(|line| line.contains(pattern))
    }
}

#[cfg(feature = "testing")]
#[async_trait]
impl Shell for ScriptedShell {
    async fn run(&self, command: &ShellCommand) -> std::io::Result<bool> {
        let line = command.to_string();
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(command.clone());

        if self.error_on.iter().any(|p| line.contains(p.as_str())) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: not found", command.program_name()),
            ));
        }
        Ok(!self.fail_on.iter().any(|p| line.contains(p.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_shell_reports_exit_status() {
        let shell = ProcessShell::new();
        assert!(shell.run(&ShellCommand::new("true")).await.unwrap());
        assert!(!shell.run(&ShellCommand::new("false")).await.unwrap());
    }

    #[tokio::test]
    async fn test_process_shell_runs_pipelines() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let cmd = ShellCommand::new("printf")
            .value("hello")
            .pipe(ShellCommand::new("tr").args(["a-z", "A-Z"]))
            .arg(">")
            .path(&out);

        assert!(ProcessShell::new().run(&cmd).await.unwrap());
        assert_eq!(std::fs::read_to_string(out).unwrap(), "HELLO");
    }

    #[tokio::test]
    async fn test_process_shell_timeout() {
        let shell = ProcessShell::with_timeout(Duration::from_millis(100));
        let err = shell
            .run(&ShellCommand::new("sleep").arg("5"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
    }

    #[tokio::test]
    async fn test_dry_run_records_and_succeeds() {
        let shell = DryRunShell::new();
        let cmd = ShellCommand::new("false");
        assert!(shell.run(&cmd).await.unwrap());
        assert_eq!(shell.commands(), vec!["false".to_string()]);
    }
}
