//! Binary configuration.

use std::env;
use std::path::PathBuf;

/// Settings of the survivor binary itself; the director reads its own.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Recording to spectate.
    pub recording: Option<PathBuf>,
    /// Overrides the platform log directory.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SURVIVOR_RECORDING` - Path of the JSON recording
    /// - `SURVIVOR_LOG_DIR` - Log directory (default: platform cache dir)
    ///
    /// A first command-line argument takes precedence over `SURVIVOR_RECORDING`.
    pub fn from_env() -> Self {
        let recording = env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| read_path("SURVIVOR_RECORDING"));

        Self {
            recording,
            log_dir: read_path("SURVIVOR_LOG_DIR"),
        }
    }
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
