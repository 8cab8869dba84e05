//! Configuration Module
//!
//! Handles loading and managing store configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::BackendKind;

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where snapshots are read at startup and written on save
    pub snapshot_path: PathBuf,
    /// Which store implementation to use
    pub backend: BackendKind,
    /// Background sweep interval in seconds (0 disables the sweep task)
    pub cleanup_interval: u64,
    /// Periodic snapshot interval in seconds (0 disables the snapshot task)
    pub snapshot_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SNAPSHOT_PATH` - Snapshot file (default: snapshot.json)
    /// - `BACKEND` - `indexed` or `reference` (default: indexed)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `SNAPSHOT_INTERVAL` - Snapshot frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            snapshot_path: env::var("SNAPSHOT_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            backend: env::var("BACKEND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            snapshot_interval: env::var("SNAPSHOT_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.snapshot_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("snapshot.json"),
            backend: BackendKind::Indexed,
            cleanup_interval: 1,
            snapshot_interval: 60,
        }
    }
}
