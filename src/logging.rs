//! Diagnostic logging setup.
//!
//! The TUI owns the terminal, so interactive runs log to a file. Headless runs
//! log to stderr so stdout stays clean for piping.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "movies_tui=info";
const LOG_FILE_NAME: &str = "movies-tui.log";

/// Where diagnostic output goes.
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
}

/// Default log file location: `<cache dir>/movies-tui/movies-tui.log`.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("movies-tui")
        .join(LOG_FILE_NAME)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create log directory {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Install the global subscriber.
///
/// A log file that cannot be opened does not stop the app: logging is
/// discarded for the run and a warning is printed before the TUI takes over
/// the screen.
pub fn init(target: LogTarget<'_>) -> Result<()> {
    match target {
        LogTarget::File(path) => match open_log_file(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))?;
            }
            Err(e) => {
                eprintln!("warning: file logging disabled: {e:#}");
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(std::io::sink)
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))?;
            }
        },
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))?;
        }
    }
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialized");
    Ok(())
}
