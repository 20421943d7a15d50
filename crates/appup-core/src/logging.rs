//! tracing setup: an append-only log file, or stderr when that is unavailable.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Open `path` for appending, creating its directory.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

/// Send every event to the file at `path`. Fails if the file cannot be
/// opened or a subscriber is already installed.
pub fn init_logging(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter_or(DEFAULT_LOG_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    tracing::info!(path = %path.display(), "appup logging initialized");
    Ok(())
}

/// Warnings and up on stderr, unless `RUST_LOG` says otherwise.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or("warn"))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_created_with_parents_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/appup/appup.log");
        open_log_file(&path).unwrap().write_all(b"one\n").unwrap();
        open_log_file(&path).unwrap().write_all(b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_log_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("state");
        fs::write(&blocker, b"file, not dir").unwrap();
        assert!(open_log_file(&blocker.join("appup.log")).is_err());
    }
}
