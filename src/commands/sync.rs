use std::fmt;
use std::future::Future;

use anyhow::Result;
use chrono::DateTime;
use chrono::Local;
use colored::Colorize;
use tracing::debug;
use tracing::info;

use crate::App;
use crate::ops::git::CommandOutput;
use crate::ops::git::GitOps;
use crate::status::WorkingTreeStatus;

/// Prefix of every commit message created by a sync.
pub const COMMIT_MESSAGE_PREFIX: &str = "Auto-sync";

/// A step of the sync that runs an external git command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stage,
    Commit,
    Pull,
    Push,
}

impl Step {
    pub fn title(&self) -> &'static str {
        match self {
            Step::Stage => "Adding Changes",
            Step::Commit => "Committing Changes",
            Step::Pull => "Pulling Latest Changes (Rebase)",
            Step::Push => "Pushing Changes",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How a sync run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every step succeeded.
    Synced,
    /// A git command exited non-zero; nothing after it ran.
    Failed(Step),
    /// The user interrupted the run.
    Cancelled,
}

/// Commit message for a sync at `now`, e.g. `Auto-sync: 2024-01-02 03:04:05`.
pub fn commit_message(now: &DateTime<Local>) -> String {
    format!(
        "{}: {}",
        COMMIT_MESSAGE_PREFIX,
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

impl<G: GitOps> App<G> {
    /// Run a sync, ending early with [`SyncOutcome::Cancelled`] if `interrupt`
    /// completes first. The in-flight git command is killed on interrupt.
    pub async fn cmd_run<F: Future>(
        &self,
        stdout: &mut impl std::io::Write,
        interrupt: F,
    ) -> Result<SyncOutcome> {
        let result = tokio::select! {
            biased;
            _ = interrupt => None,
            outcome = self.cmd_sync(&mut *stdout) => Some(outcome),
        };

        match result {
            Some(outcome) => outcome,
            None => {
                info!("sync interrupted");
                writeln!(stdout)?;
                writeln!(stdout, "{}", "Sync cancelled by user.".yellow())?;
                Ok(SyncOutcome::Cancelled)
            }
        }
    }

    /// Commit local changes, rebase onto the remote branch, then push.
    ///
    /// 1. Query the working tree status.
    /// 2. If anything changed, stage everything and commit it with a
    ///    timestamped message.
    /// 3. Pull from the configured remote branch with `--rebase`, even when
    ///    there was nothing to commit.
    /// 4. Push to the configured remote branch.
    ///
    /// A git command that exits non-zero stops the run and is reported as
    /// [`SyncOutcome::Failed`]. `Err` is reserved for failures to run git at all.
    pub async fn cmd_sync(&self, stdout: &mut impl std::io::Write) -> Result<SyncOutcome> {
        let remote = &self.config.remote;
        let branch = &self.config.branch;

        writeln!(stdout, "Checking Git status...")?;
        let status = WorkingTreeStatus::new(self.git.status().await?);

        if status.is_clean() {
            info!("working tree clean");
            writeln!(
                stdout,
                "No changes to sync. Checking for updates from remote..."
            )?;
        } else {
            let entries = status.entries();
            debug!(?entries, "working tree has changes");
            let noun = if entries.len() == 1 { "path" } else { "paths" };
            writeln!(stdout, "Found {} changed {}.", entries.len(), noun)?;

            write_section(stdout, Step::Stage)?;
            let output = self.git.add_all().await?;
            if !report(stdout, &output)? {
                return Ok(SyncOutcome::Failed(Step::Stage));
            }

            write_section(stdout, Step::Commit)?;
            let message = commit_message(&Local::now());
            info!(%message, "committing");
            let output = self.git.commit(&message).await?;
            if !report(stdout, &output)? {
                return Ok(SyncOutcome::Failed(Step::Commit));
            }
        }

        write_section(stdout, Step::Pull)?;
        let output = self.git.pull_rebase(remote, branch).await?;
        if !report(stdout, &output)? {
            writeln!(stdout)?;
            writeln!(
                stdout,
                "{}",
                "Sync failed. You might need to resolve conflicts manually.".yellow()
            )?;
            return Ok(SyncOutcome::Failed(Step::Pull));
        }

        write_section(stdout, Step::Push)?;
        let output = self.git.push(remote, branch).await?;
        if !report(stdout, &output)? {
            return Ok(SyncOutcome::Failed(Step::Push));
        }

        info!(%remote, %branch, "sync complete");
        writeln!(stdout)?;
        let done = format!("Success! Your workspace is in sync with {remote}/{branch}.");
        writeln!(stdout, "{}", done.green())?;

        Ok(SyncOutcome::Synced)
    }
}

fn write_section(stdout: &mut impl std::io::Write, step: Step) -> Result<()> {
    writeln!(stdout)?;
    let header = format!("==== {} ====", step);
    writeln!(stdout, "{}", header.bold())?;
    Ok(())
}

/// Echo a command's output. Returns whether the command succeeded.
fn report(stdout: &mut impl std::io::Write, output: &CommandOutput) -> Result<bool> {
    if output.success {
        let text = output.stdout.trim_end();
        if !text.is_empty() {
            writeln!(stdout, "{}", text)?;
        }
        return Ok(true);
    }

    debug!(command = %output.command, "git command failed");
    let header = format!("Error executing {}:", output.command);
    writeln!(stdout, "{}", header.red())?;
    // Git reports some failures (conflicts, nothing to commit) on stdout
    for text in [&output.stdout, &output.stderr] {
        let text = text.trim_end();
        if !text.is_empty() {
            writeln!(stdout, "{}", text)?;
        }
    }
    Ok(false)
}
