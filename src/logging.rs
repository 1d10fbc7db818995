use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app_dirs::AppDirs;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Logs go to a file because the terminal
/// belongs to the UI; if no file can be opened logging is filtered but silent.
/// Returns the log path in use, if any.
pub fn init_logging() -> Option<PathBuf> {
    let path = AppDirs::log_path()?;

    match open_log_file(&path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter())
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
            Some(path)
        }
        Err(err) => {
            tracing_subscriber::registry().with(env_filter()).init();
            tracing::warn!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}
