use std::future::Future;

use anyhow::Result;

/// How the exit prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Entered,
    Interrupted,
}

/// Print `Press Enter to exit...` and wait until `read_line` returns or
/// `interrupt` completes.
///
/// `read_line` runs on the blocking pool. On interrupt it is left blocked, so
/// the caller should exit the process rather than wait for the runtime to
/// shut down.
pub async fn wait_for_enter<R, F>(
    stdout: &mut impl std::io::Write,
    read_line: R,
    interrupt: F,
) -> Result<Pause>
where
    R: FnOnce() -> std::io::Result<()> + Send + 'static,
    F: Future,
{
    writeln!(stdout)?;
    write!(stdout, "Press Enter to exit...")?;
    stdout.flush()?;

    let reader = tokio::task::spawn_blocking(read_line);
    tokio::select! {
        biased;
        _ = interrupt => {
            writeln!(stdout)?;
            Ok(Pause::Interrupted)
        }
        _ = reader => Ok(Pause::Entered),
    }
}

/// Read one line from the terminal.
pub fn read_stdin_line() -> std::io::Result<()> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(())
}
