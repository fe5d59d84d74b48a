//! Diagnostic logging for toolfetch.
//!
//! Records go to `$XDG_STATE_HOME/toolfetch/toolfetch.log` when that file can
//! be opened, otherwise to stderr. Console progress is not written here.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,toolfetch=debug,toolfetch_core=debug";

/// Path of the diagnostic log: `$XDG_STATE_HOME/toolfetch/toolfetch.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("toolfetch")?;
    Ok(dirs.get_state_home().join("toolfetch.log"))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens `path` for appending, creating parent directories.
fn open_append(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Installs the global subscriber writing to the XDG log file and returns its path.
/// Errors leave no subscriber installed, so the caller can use `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_append(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("install log subscriber: {}", e))?;
    tracing::info!(path = %path.display(), "toolfetch logging initialized");
    Ok(path)
}

/// Installs a stderr-only subscriber. Does nothing if one is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
