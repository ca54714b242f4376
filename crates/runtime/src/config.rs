//! Director configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{CatalogConfig, Surface};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read catalog file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Configuration shared by the director and its workers.
#[derive(Clone, Debug)]
pub struct DirectorConfig {
    pub surface: Surface,
    /// Whether the network supports requested randomness at all.
    pub vrf_enabled: bool,
    pub command_buffer_size: usize,
    pub submission_buffer_size: usize,
    pub signal_buffer_size: usize,
    /// Start finished-session replays without waiting for `play`.
    pub replay_autoplay: bool,
    /// RON file replacing the surface preset.
    pub catalog_file: Option<PathBuf>,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            surface: Surface::Desktop,
            vrf_enabled: true,
            command_buffer_size: 32,
            submission_buffer_size: 32,
            signal_buffer_size: 256,
            replay_autoplay: true,
            catalog_file: None,
        }
    }
}

impl DirectorConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DIRECTOR_SURFACE` - `desktop` or `mobile` (default: desktop)
    /// - `DIRECTOR_VRF` - Network supports requested randomness (default: true)
    /// - `DIRECTOR_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `DIRECTOR_SUBMISSION_BUFFER` - Pending batch queue size (default: 32)
    /// - `DIRECTOR_SIGNAL_BUFFER` - Per-topic signal capacity (default: 256)
    /// - `DIRECTOR_REPLAY_AUTOPLAY` - Start replays immediately (default: true)
    /// - `DIRECTOR_CATALOG_FILE` - RON catalog overriding the surface preset
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(surface) = read_env::<Surface>("DIRECTOR_SURFACE") {
            config.surface = surface;
        }
        if let Some(enabled) = read_env_bool("DIRECTOR_VRF") {
            config.vrf_enabled = enabled;
        }

        // Channel configuration
        if let Some(capacity) = read_env::<usize>("DIRECTOR_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("DIRECTOR_SUBMISSION_BUFFER") {
            config.submission_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("DIRECTOR_SIGNAL_BUFFER") {
            config.signal_buffer_size = capacity.max(1);
        }

        if let Some(autoplay) = read_env_bool("DIRECTOR_REPLAY_AUTOPLAY") {
            config.replay_autoplay = autoplay;
        }
        config.catalog_file = env::var("DIRECTOR_CATALOG_FILE").ok().map(PathBuf::from);

        config
    }

    /// Catalog data for this configuration: the override file if set,
    /// otherwise the surface preset.
    pub fn catalog(&self) -> Result<CatalogConfig, ConfigError> {
        match &self.catalog_file {
            Some(path) => CatalogConfig::load(path),
            None => Ok(CatalogConfig::for_surface(self.surface)),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
