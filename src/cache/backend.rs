//! Backend Module
//!
//! The capability set every store implementation provides, and the
//! construction-time choice between implementations.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::cache::{CacheStats, CacheStore, Clock, IndexedStore};
use crate::error::Result;
use crate::snapshot::{self, LoadOutcome, Snapshot};

// == Backend Trait ==
/// A key/value store with per-key expiration.
///
/// Expired entries are logically absent: `get` removes one it observes,
/// and `sweep_expired` removes all of them.
pub trait Backend: Send + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inserts or fully replaces `key`. `None` and `Some(0)` both mean
    /// "never expires".
    fn set(&mut self, key: String, value: Value, ttl_seconds: Option<u64>);

    /// Returns the live value, evicting the entry if it has expired.
    fn get(&mut self, key: &str) -> Option<Value>;

    /// Removes `key` whatever its expiration state. Returns whether
    /// anything was removed.
    fn delete(&mut self, key: &str) -> bool;

    /// Removes every expired entry and returns how many were removed.
    fn sweep_expired(&mut self) -> usize;

    /// Number of stored entries, including expired ones not yet removed.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> CacheStats;

    /// Captures every stored entry, expired or not.
    fn export(&self) -> Snapshot;

    /// Replaces the contents with `snapshot`, skipping entries already
    /// expired. Returns the outcome counts.
    fn restore(&mut self, snapshot: Snapshot) -> LoadOutcome;

    // == Snapshot Persistence ==
    /// Writes the current contents to `path`.
    fn save_snapshot(&self, path: &Path) -> Result<()> {
        snapshot::save(&self.export(), path)
    }

    /// Replaces the contents with the snapshot at `path`.
    ///
    /// A missing file leaves the store untouched and yields
    /// `LoadOutcome::NotFound`. Read or parse failures also leave it
    /// untouched.
    fn load_snapshot(&mut self, path: &Path) -> Result<LoadOutcome> {
        match snapshot::load(path)? {
            Some(snapshot) => Ok(self.restore(snapshot)),
            None => Ok(LoadOutcome::NotFound),
        }
    }
}

// == Backend Kind ==
/// Selects which implementation backs a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Single hash map; sweeps scan every entry
    Reference,
    /// Hash map plus a deadline index; sweeps touch only expired entries
    #[default]
    Indexed,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Reference => "reference",
            BackendKind::Indexed => "indexed",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" => Ok(BackendKind::Reference),
            "indexed" => Ok(BackendKind::Indexed),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

// == Open Backend ==
/// Builds an empty store of the requested kind.
pub fn open_backend(kind: BackendKind, clock: Arc<dyn Clock>) -> Box<dyn Backend> {
    let backend: Box<dyn Backend> = match kind {
        BackendKind::Reference => Box::new(CacheStore::new(clock)),
        BackendKind::Indexed => Box::new(IndexedStore::new(clock)),
    };
    info!("Using {} backend", backend.name());
    backend
}
