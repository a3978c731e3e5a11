#![allow(dead_code)]

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Runs git in `dir` and returns its stdout. Fails if git exits non-zero.
pub async fn git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await?;
    anyhow::ensure!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(String::from_utf8(output.stdout)?)
}

/// Creates a git repository in the given directory.
///
/// This initializes the repo on branch `main` and sets basic git config
/// needed for commits. The directory should already exist.
pub async fn create_git_repo(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["init", "-b", "main"]).await?;
    configure_identity(dir).await
}

/// Creates a bare repository to act as the remote.
pub async fn create_bare_repo(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["init", "--bare", "-b", "main"]).await?;
    Ok(())
}

/// Clones `remote` into `dir` and sets the identity used for commits.
pub async fn clone_repo(remote: &Path, dir: &Path) -> anyhow::Result<()> {
    let remote = remote.to_string_lossy();
    let target = dir.to_string_lossy();
    git(Path::new("."), &["clone", "-q", &remote, &target]).await?;
    configure_identity(dir).await
}

async fn configure_identity(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["config", "user.name", "Test User"]).await?;
    git(dir, &["config", "user.email", "test@example.com"]).await?;
    Ok(())
}

/// Sets up a git remote origin for the repository.
pub async fn setup_git_remote(dir: &Path, remote: &Path) -> anyhow::Result<()> {
    git(dir, &["remote", "add", "origin", &remote.to_string_lossy()]).await?;
    Ok(())
}

/// Writes a file and commits it.
pub async fn commit_file(
    dir: &Path,
    message: &str,
    filename: &str,
    contents: &str,
) -> anyhow::Result<()> {
    tokio::fs::write(dir.join(filename), contents).await?;
    git(dir, &["add", filename]).await?;
    git(dir, &["commit", "-q", "-m", message]).await?;
    Ok(())
}

/// Subjects of the commits on `rev`, newest first.
pub async fn log_subjects(dir: &Path, rev: &str) -> anyhow::Result<String> {
    git(dir, &["log", "--format=%s", rev]).await
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_test_writer()
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(std::path::PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}
