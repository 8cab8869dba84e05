//! Cache Store Module
//!
//! Reference backend: a single HashMap with lazy and sweep-based expiration.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::cache::{Backend, CacheEntry, CacheStats, Clock};
use crate::snapshot::{LoadOutcome, Snapshot};

// == Cache Store ==
/// Key/value storage with per-key TTL.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Access statistics
    stats: CacheStats,
    /// Time source for deadlines
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    /// Returns the raw entry for `key`, without checking expiration.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    fn remove_entries(&mut self, keys: Vec<String>) -> usize {
        let count = keys.len();
        for key in keys {
            self.entries.remove(&key);
        }
        count
    }
}

impl Backend for CacheStore {
    fn name(&self) -> &'static str {
        "reference"
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the value and expiration are replaced.
    fn set(&mut self, key: String, value: Value, ttl_seconds: Option<u64>) {
        let entry = CacheEntry::new(value, ttl_seconds, self.clock.now_ms());
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and counted as misses.
    fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.record_miss();
            return None;
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        Some(value)
    }

    // == Delete ==
    fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = self.remove_entries(expired_keys);
        self.stats.record_expired(count);
        count
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    fn export(&self) -> Snapshot {
        Snapshot::capture(&self.entries)
    }

    fn restore(&mut self, snapshot: Snapshot) -> LoadOutcome {
        let restored = snapshot.into_entries(self.clock.now_ms());
        self.entries = restored.entries.into_iter().collect();

        LoadOutcome::Loaded {
            restored: self.entries.len(),
            dropped: restored.dropped,
        }
    }
}
