use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use autosync::App;
use autosync::Config;
use autosync::commands::SyncOutcome;
use autosync::ops::git::RealGit;
use autosync::pause::Pause;
use autosync::pause::read_stdin_line;
use autosync::pause::wait_for_enter;
use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "autosync")]
#[command(about = "Commit local changes, rebase onto the remote branch, and push", long_about = None)]
pub struct Cli {
    /// Remote to pull from and push to [default: autosync.remote or "origin"]
    #[arg(long)]
    pub remote: Option<String>,
    /// Branch to pull and push [default: autosync.branch or "main"]
    #[arg(long)]
    pub branch: Option<String>,
    /// Repository to sync (defaults to the current directory)
    #[arg(short = 'C', long = "repo", default_value = ".")]
    pub repo: PathBuf,
    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to set up logging: {e:#}");
    }

    let mut stdout = std::io::stdout();
    let outcome = run(&cli, &mut stdout).await;

    let (code, cancelled) = match outcome {
        Ok(SyncOutcome::Synced) => (0, false),
        Ok(SyncOutcome::Failed(_)) => (1, false),
        Ok(SyncOutcome::Cancelled) => (1, true),
        Err(e) => {
            let msg = format!("An unexpected error occurred: {e:#}");
            println!();
            println!("{}", msg.red());
            (1, false)
        }
    };

    // Ctrl+C already ended the run, so don't ask for another key press
    if !cancelled && !cli.no_pause && std::io::stdin().is_terminal() {
        let pause =
            wait_for_enter(&mut stdout, read_stdin_line, tokio::signal::ctrl_c()).await;
        if matches!(pause, Ok(Pause::Interrupted)) {
            // The stdin reader is still blocked; exit without joining it
            std::process::exit(code.into());
        }
    }

    ExitCode::from(code)
}

async fn run(cli: &Cli, stdout: &mut impl std::io::Write) -> Result<SyncOutcome> {
    let config = Config::load(&cli.repo)?.with_overrides(cli.remote.clone(), cli.branch.clone());
    let app = App::new(config, RealGit::new(cli.repo.clone()));

    app.cmd_run(stdout, tokio::signal::ctrl_c()).await
}

fn setup_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
