//! Configuration for contractkv
//!
//! Settings for the bundled reference host store and its snapshot file.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main configuration for a `MemoryStore` instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// File the store is loaded from on `open` and written to on `persist`
    pub snapshot_path: PathBuf,

    /// Sync strategy: whether to fsync the snapshot after writing it
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Largest single value accepted when loading a snapshot (in bytes)
    pub max_value_size: usize,
}

/// Snapshot sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every persist (safest, slowest)
    Always,

    /// Leave flushing to the OS
    Never,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./contract_state.ckvs"),
            sync_strategy: SyncStrategy::Always,
            max_value_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the settings for values the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(Error::Config("snapshot_path must not be empty".to_string()));
        }
        if self.max_value_size == 0 {
            return Err(Error::Config("max_value_size must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the snapshot file path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = path.into();
        self
    }

    /// Set the snapshot sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the maximum value size (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
