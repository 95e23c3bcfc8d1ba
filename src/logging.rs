//! Tracing subscriber setup for the binary

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::log_path;

/// Install a global subscriber appending to [`log_path`].
///
/// `RUST_LOG` overrides `default_directive`. Falls back to stderr when the log
/// file cannot be opened. The returned guard must be held until exit so
/// buffered lines are flushed.
pub fn init(default_directive: &str, json: bool) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let path = log_path();
    match open_log_file(&path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let builder = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(writer);

            if json {
                builder.json().init();
            } else {
                builder.init();
            }

            info!(path = %path.display(), "logging initialized");
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
            warn!(error = %e, path = %path.display(), "failed to open log file; using stderr");
            None
        }
    }
}

/// Open `path` for appending, creating it and its parent directories
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
