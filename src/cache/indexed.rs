//! Indexed Store Module
//!
//! Backend that keeps an ordered index of deadlines next to the entries,
//! so sweeps only visit keys that have actually expired.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::Value;

use crate::cache::{Backend, CacheEntry, CacheStats, Clock};
use crate::snapshot::{LoadOutcome, Snapshot};

// == Expiry Index ==
/// Keys ordered by deadline.
///
/// Front = soonest to expire.
#[derive(Debug, Default)]
struct ExpiryIndex {
    order: BTreeSet<(u64, String)>,
}

impl ExpiryIndex {
    fn insert(&mut self, expires_at: u64, key: &str) {
        self.order.insert((expires_at, key.to_string()));
    }

    fn remove(&mut self, expires_at: u64, key: &str) {
        self.order.remove(&(expires_at, key.to_string()));
    }

    /// Removes and returns every key whose deadline is at or before `now_ms`.
    fn drain_expired(&mut self, now_ms: u64) -> Vec<String> {
        let mut expired = Vec::new();
        while let Some((expires_at, _)) = self.order.first() {
            if *expires_at > now_ms {
                break;
            }
            if let Some((_, key)) = self.order.pop_first() {
                expired.push(key);
            }
        }
        expired
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

// == Indexed Store ==
/// Key/value storage with a deadline index.
#[derive(Debug)]
pub struct IndexedStore {
    entries: HashMap<String, CacheEntry>,
    expiry: ExpiryIndex,
    stats: CacheStats,
    clock: Arc<dyn Clock>,
}

impl IndexedStore {
    // == Constructor ==
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            expiry: ExpiryIndex::default(),
            stats: CacheStats::new(),
            clock,
        }
    }

    /// Number of entries carrying a deadline.
    pub fn expiring_len(&self) -> usize {
        self.expiry.len()
    }

    fn insert_entry(&mut self, key: String, entry: CacheEntry) {
        if let Some(expires_at) = entry.expires_at {
            self.expiry.insert(expires_at, &key);
        }
        if let Some(old) = self.entries.insert(key.clone(), entry) {
            if let Some(old_deadline) = old.expires_at {
                self.unindex_stale(old_deadline, &key);
            }
        }
    }

    // A replaced entry may share its deadline with the new one.
    fn unindex_stale(&mut self, old_deadline: u64, key: &str) {
        let current = self.entries.get(key).and_then(|e| e.expires_at);
        if current != Some(old_deadline) {
            self.expiry.remove(old_deadline, key);
        }
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        if let Some(expires_at) = entry.expires_at {
            self.expiry.remove(expires_at, key);
        }
        Some(entry)
    }
}

impl Backend for IndexedStore {
    fn name(&self) -> &'static str {
        "indexed"
    }

    fn set(&mut self, key: String, value: Value, ttl_seconds: Option<u64>) {
        let entry = CacheEntry::new(value, ttl_seconds, self.clock.now_ms());
        self.insert_entry(key, entry);
    }

    fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.remove_entry(key);
            self.stats.record_expired(1);
            self.stats.record_miss();
            return None;
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        Some(value)
    }

    fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    fn sweep_expired(&mut self) -> usize {
        let expired = self.expiry.drain_expired(self.clock.now_ms());
        let count = expired.len();
        for key in expired {
            self.entries.remove(&key);
        }
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
        self.entries.clear();
        self.expiry.clear();
        for (key, entry) in restored.entries {
            self.insert_entry(key, entry);
        }

        LoadOutcome::Loaded {
            restored: self.entries.len(),
            dropped: restored.dropped,
        }
    }
}
