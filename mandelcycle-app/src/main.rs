mod app;
mod app_dir;
mod ascii;
mod commands;
mod display_color;
mod error;
mod navigation;
mod preferences;
mod render_bridge;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info, warn};

use app::Explorer;
use commands::{Command, Flow};
use error::{AppError, Result};
use preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Read loop
// ---------------------------------------------------------------------------

fn run<R: BufRead, W: Write>(
    explorer: &mut Explorer,
    prefs_path: &Path,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{}", explorer.status())?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match line.parse::<Command>() {
                Ok(command) => match commands::execute(explorer, command, prefs_path, out) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(AppError::Io(e)) => return Err(e.into()),
                    Err(e) => {
                        warn!("{e}");
                        writeln!(out, "error: {e}")?;
                    }
                },
                Err(e) => writeln!(out, "{e} (type 'help' for commands)")?,
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting MandelCycle");

    let prefs = AppPreferences::load();
    let prefs_path = preferences::config_path();

    let mut explorer = match Explorer::new(&prefs) {
        Ok(explorer) => explorer,
        Err(e) => {
            error!("Failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match run(&mut explorer, &prefs_path, stdin.lock(), &mut stdout) {
        Ok(()) => {
            info!("Exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::small_prefs;

    #[test]
    fn scripted_session() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let script = "in\nfly\n\nback\nback\nclick 99 0\nquit\nin\n";
        let mut out = Vec::new();
        let prefs_path = std::env::temp_dir().join("mandelcycle-session-unused.json");
        run(&mut explorer, &prefs_path, script.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("width/height: 1"));
        assert!(text.contains("unknown command 'fly'"));
        assert!(text.contains("Already at the first view"));
        assert!(text.contains("error: invalid command: pixel (99, 0)"));
        // Nothing after quit runs.
        assert_eq!(explorer.status().depth, 1);
    }

    #[test]
    fn failed_save_keeps_session_running() {
        let blocker = std::env::temp_dir().join(format!("mandelcycle-blocker-{}", std::process::id()));
        std::fs::write(&blocker, "not a directory").unwrap();
        let prefs_path = blocker.join("preferences.json");

        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let mut out = Vec::new();
        run(&mut explorer, &prefs_path, "save\nstatus\n".as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("error: failed to save preferences"));
        assert!(!text.contains("Saved"));
        assert_eq!(text.matches("width/height: 4").count(), 2);
        let _ = std::fs::remove_file(&blocker);
    }
}
