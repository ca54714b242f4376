//! Logging setup for the survivor binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform-specific log directory.
///
/// - macOS: `~/Library/Caches/survivor/logs`
/// - Linux: `~/.cache/survivor/logs` (or `$XDG_CACHE_HOME/survivor/logs`)
/// - Windows: `%LOCALAPPDATA%\survivor\logs`
/// - Fallback: `/tmp/survivor/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "survivor")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/survivor"))
        .join("logs")
}

/// Setup logging to both stderr and a per-session file.
pub fn setup_logging(log_root: Option<PathBuf>, session_label: &str) -> Result<PathBuf> {
    let session_log_dir = log_root.unwrap_or_else(log_dir).join(session_label);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "Failed to create log directory: {}",
            session_log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    // The writer thread must outlive main.
    std::mem::forget(guard);

    tracing::info!(session = session_label, "logging initialized");
    tracing::info!("Log file: {}/client.log", session_log_dir.display());

    Ok(session_log_dir)
}
