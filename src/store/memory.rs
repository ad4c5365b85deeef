//! In-process host store
//!
//! BTreeMap behind a RwLock, with call counters so callers can see how many
//! round trips a container really makes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;

use super::snapshot::{read_snapshot, write_snapshot};
use super::HostStore;

/// Counts of host calls since creation or the last `reset_stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Non-empty `put` calls
    pub puts: u64,
    /// `put` calls with an empty value
    pub deletes: u64,
    pub size_queries: u64,
    pub gets: u64,
}

#[derive(Debug, Default)]
struct Counters {
    puts: AtomicU64,
    deletes: AtomicU64,
    size_queries: AtomicU64,
    gets: AtomicU64,
}

/// Reference `HostStore` kept in memory, optionally backed by a snapshot file
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    counters: Counters,
    config: Config,
}

impl MemoryStore {
    /// Empty store with the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the snapshot at `config.snapshot_path`, or start empty if there is none
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let data = if config.snapshot_path.exists() {
            read_snapshot(&config.snapshot_path, config.max_value_size)?
        } else {
            tracing::debug!(
                path = %config.snapshot_path.display(),
                "no snapshot found, starting empty"
            );
            BTreeMap::new()
        };

        tracing::info!(entries = data.len(), "memory store opened");

        Ok(Self {
            data: RwLock::new(data),
            counters: Counters::default(),
            config,
        })
    }

    /// Write the current contents to `config.snapshot_path`
    pub fn persist(&self) -> Result<()> {
        let data = self.data.read();
        write_snapshot(&self.config.snapshot_path, &data, self.config.sync_strategy)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Every stored key, in order
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.data.read().keys().cloned().collect()
    }

    /// Stored bytes for a raw key, bypassing the counters
    pub fn raw_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }

    /// Total key and value bytes held
    pub fn total_bytes(&self) -> usize {
        self.data
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            puts: self.counters.puts.load(Ordering::Relaxed),
            deletes: self.counters.deletes.load(Ordering::Relaxed),
            size_queries: self.counters.size_queries.load(Ordering::Relaxed),
            gets: self.counters.gets.load(Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.counters.puts.store(0, Ordering::Relaxed);
        self.counters.deletes.store(0, Ordering::Relaxed);
        self.counters.size_queries.store(0, Ordering::Relaxed);
        self.counters.gets.store(0, Ordering::Relaxed);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.data.write().clear();
    }
}

impl HostStore for MemoryStore {
    fn put(&self, key: &[u8], value: &[u8]) {
        let mut data = self.data.write();
        if value.is_empty() {
            self.counters.deletes.fetch_add(1, Ordering::Relaxed);
            let existed = data.remove(key).is_some();
            tracing::trace!(key_len = key.len(), existed, "host delete");
        } else {
            self.counters.puts.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(key_len = key.len(), value_len = value.len(), "host put");
            data.insert(key.to_vec(), value.to_vec());
        }
    }

    fn query_size(&self, key: &[u8]) -> usize {
        self.counters.size_queries.fetch_add(1, Ordering::Relaxed);
        let size = self.data.read().get(key).map_or(0, Vec::len);
        tracing::trace!(key_len = key.len(), size, "host query_size");
        size
    }

    fn get(&self, key: &[u8], out: &mut [u8]) {
        self.counters.gets.fetch_add(1, Ordering::Relaxed);
        let data = self.data.read();
        if let Some(value) = data.get(key) {
            let n = value.len().min(out.len());
            out[..n].copy_from_slice(&value[..n]);
            tracing::trace!(key_len = key.len(), copied = n, "host get");
        } else {
            tracing::trace!(key_len = key.len(), "host get on absent key");
        }
    }
}
