//! Snapshot Codec
//!
//! Serializes store contents to a JSON document and reads it back.
//!
//! # Format
//! ```json
//! { "data": { "name": "Satyam" }, "ttl": { "age": 1700000123.5 } }
//! ```
//! `ttl` holds absolute expiration instants in seconds since the Unix epoch,
//! not durations. Keys missing from `ttl` never expire.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::CacheEntry;
use crate::error::{Result, StoreError};

// == Snapshot Document ==
/// Point-in-time image of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Key to value
    pub data: BTreeMap<String, Value>,
    /// Key to absolute expiration time, in seconds since epoch
    #[serde(default)]
    pub ttl: BTreeMap<String, f64>,
}

/// Entries rebuilt from a snapshot, minus those already expired.
#[derive(Debug, Default)]
pub struct Restored {
    pub entries: Vec<(String, CacheEntry)>,
    /// Entries skipped because their deadline had passed at load time
    pub dropped: usize,
}

// == Load Outcome ==
/// Result of asking a store to rehydrate from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot was read and the store replaced
    Loaded { restored: usize, dropped: usize },
    /// No file at the path; the store was left as it was
    NotFound,
}

impl Snapshot {
    // == Capture ==
    /// Builds a snapshot from live entries. Expired entries are kept as-is.
    pub fn capture<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a CacheEntry)>,
    {
        let mut snapshot = Snapshot::default();
        for (key, entry) in entries {
            snapshot.data.insert(key.clone(), entry.value.clone());
            if let Some(expires_at) = entry.expires_at {
                snapshot.ttl.insert(key.clone(), ms_to_secs(expires_at));
            }
        }
        snapshot
    }

    // == Into Entries ==
    /// Converts the document back into entries, evaluated at `now_ms`.
    ///
    /// Anything whose deadline is at or before `now_ms` is dropped. Deadlines
    /// for keys absent from `data` are ignored.
    pub fn into_entries(self, now_ms: u64) -> Restored {
        let Snapshot { data, ttl } = self;
        let mut restored = Restored::default();

        for (key, value) in data {
            let expires_at = ttl.get(&key).copied().map(secs_to_ms);
            let entry = CacheEntry::with_deadline(value, expires_at);
            if entry.is_expired(now_ms) {
                restored.dropped += 1;
                continue;
            }
            restored.entries.push((key, entry));
        }

        restored
    }
}

// == Save ==
/// Writes `snapshot` to `path`.
///
/// The document goes to a uniquely named temp file in the same directory
/// and is renamed into place, so readers see either the old snapshot or
/// the new one, and concurrent saves never share a temp file. The temp
/// file is removed if any step fails.
pub fn save(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec(snapshot)?;
    let dir = parent_dir(path);

    let mut tmp = tempfile::Builder::new()
        .prefix(".snapshot-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|err| StoreError::io(dir, err))?;

    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|err| StoreError::io(tmp.path(), err))?;

    tmp.persist(path).map_err(|err| StoreError::io(path, err.error))?;

    info!(
        "Snapshot saved to {} ({} entries)",
        path.display(),
        snapshot.data.len()
    );
    Ok(())
}

// == Load ==
/// Reads a snapshot from `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<Snapshot>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("No snapshot file found: {}", path.display());
            return Ok(None);
        }
        Err(err) => return Err(StoreError::io(path, err)),
    };

    let snapshot: Snapshot =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Read snapshot {} ({} entries, {} with TTL)",
        path.display(),
        snapshot.data.len(),
        snapshot.ttl.len()
    );
    Ok(Some(snapshot))
}

// == Helpers ==
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

fn secs_to_ms(secs: f64) -> u64 {
    // Float-to-int casts saturate, so negative deadlines become 0.
    (secs * 1000.0).round() as u64
}
