use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use tracing::debug;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";

const REMOTE_KEY: &str = "autosync.remote";
const BRANCH_KEY: &str = "autosync.branch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub remote: String,
    pub branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl Config {
    /// Load config from the repository's git config, falling back to defaults
    /// for keys that are not set.
    pub fn load(repo: &Path) -> Result<Self> {
        let defaults = Self::default();
        let remote = read_git_config(repo, REMOTE_KEY)?.unwrap_or(defaults.remote);
        let branch = read_git_config(repo, BRANCH_KEY)?.unwrap_or(defaults.branch);

        Ok(Self { remote, branch })
    }

    /// Create a new config with explicit values (useful for tests)
    pub fn new(remote: String, branch: String) -> Self {
        Self { remote, branch }
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, remote: Option<String>, branch: Option<String>) -> Self {
        if let Some(remote) = remote {
            self.remote = remote;
        }
        if let Some(branch) = branch {
            self.branch = branch;
        }
        self
    }
}

/// Read a single key with `git config --get`. Unset keys yield `None`.
fn read_git_config(repo: &Path, key: &str) -> Result<Option<String>> {
    let output = std::process::Command::new("git")
        .current_dir(repo)
        .args(["config", "--get", key])
        .output()
        .context("Failed to execute git command")?;

    if !output.status.success() {
        debug!(key, "not set in git config");
        return Ok(None);
    }

    let value = String::from_utf8(output.stdout)?.trim().to_string();
    if value.is_empty() {
        return Ok(None);
    }

    debug!(key, %value, "read from git config");
    Ok(Some(value))
}
