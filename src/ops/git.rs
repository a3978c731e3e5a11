#![allow(async_fn_in_trait)]

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::debug;
use tracing::instrument;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations the sync needs from Git.
///
/// `Err` means git could not be run at all. A mutating command that ran but
/// exited non-zero is reported through [`CommandOutput::success`] instead.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Porcelain status of the working tree. Fails if git exits non-zero.
    async fn status(&self) -> Result<String>;
    async fn add_all(&self) -> Result<CommandOutput>;
    async fn commit(&self, message: &str) -> Result<CommandOutput>;
    async fn pull_rebase(&self, remote: &str, branch: &str) -> Result<CommandOutput>;
    async fn push(&self, remote: &str, branch: &str) -> Result<CommandOutput>;
}

/// Result of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// The command line as shown to the user, e.g. `git add .`
    pub command: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit {
    path: PathBuf,
}

impl RealGit {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let command = display_command(args);
        debug!(%command, path = %self.path.display(), "running");

        let output = Command::new("git")
            .current_dir(&self.path)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .context("Failed to execute git command")?;

        Ok(CommandOutput {
            command,
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl GitOps for RealGit {
    #[instrument(skip_all)]
    async fn status(&self) -> Result<String> {
        let output = self.run(&["status", "--porcelain"]).await?;

        if !output.success {
            bail!("git command failed: {}", output.stderr.trim_end());
        }

        Ok(output.stdout)
    }

    #[instrument(skip_all)]
    async fn add_all(&self) -> Result<CommandOutput> {
        self.run(&["add", "."]).await
    }

    #[instrument(skip(self))]
    async fn commit(&self, message: &str) -> Result<CommandOutput> {
        self.run(&["commit", "-m", message]).await
    }

    #[instrument(skip(self))]
    async fn pull_rebase(&self, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.run(&["pull", "--rebase", remote, branch]).await
    }

    #[instrument(skip(self))]
    async fn push(&self, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.run(&["push", remote, branch]).await
    }
}

/// Render a git invocation for display, quoting arguments that contain spaces.
fn display_command(args: &[&str]) -> String {
    let mut command = String::from("git");
    for arg in args {
        command.push(' ');
        if arg.contains(char::is_whitespace) {
            command.push('"');
            command.push_str(arg);
            command.push('"');
        } else {
            command.push_str(arg);
        }
    }
    command
}

// -----------------------------------------------------------------------------
// Test helpers

#[cfg(test)]
impl CommandOutput {
    pub fn ok(command: &str, stdout: &str) -> Self {
        Self {
            command: command.to_string(),
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(command: &str, stderr: &str) -> Self {
        Self {
            command: command.to_string(),
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}
