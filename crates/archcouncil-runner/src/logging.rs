use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Daily log files are named `archcouncil.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "archcouncil.log";

/// Install the global subscriber: warnings to stderr (or `RUST_LOG`), and
/// an append-only daily file at `info` under `log_dir`.
///
/// Keep the returned guard alive for the life of the process so buffered
/// file writes are flushed.
pub fn init(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX));

    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(stderr_filter),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(EnvFilter::new("info")),
        )
        .try_init()?;
    Ok(guard)
}

/// Most recent log file in `log_dir`, if any.
pub fn latest_log_file(log_dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(log_dir)
        .ok()?
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
        .map(|e| e.path())
        .max()
}

/// The last `lines` lines of the most recent log file.
pub fn tail(log_dir: &Path, lines: usize) -> std::io::Result<Option<String>> {
    let Some(path) = latest_log_file(log_dir) else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)?;
    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    Ok(Some(all[start..].join("\n")))
}
