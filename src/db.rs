//! Shared Store Handle
//!
//! Cloneable async handle that serializes every operation on one backend.
//!
//! `get` mutates on lazy eviction, so reads and writes share a single
//! mutex. Snapshot file I/O runs on the blocking pool with that mutex
//! released; a separate save lock keeps saves one at a time and in the
//! order they captured the store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

use crate::cache::{open_backend, Backend, BackendKind, CacheStats, Clock, SystemClock};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::snapshot::{self, LoadOutcome, Snapshot};

// == Db Handle ==
/// Thread-safe handle over a single backend.
#[derive(Clone, Debug)]
pub struct Db {
    inner: Arc<Mutex<Box<dyn Backend>>>,
    /// Held from capture until the file is in place
    save_lock: Arc<Mutex<()>>,
}

impl Db {
    /// Wraps an existing backend.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(backend)),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates an empty store of the given kind.
    pub fn with_backend(kind: BackendKind, clock: Arc<dyn Clock>) -> Self {
        Self::new(open_backend(kind, clock))
    }

    // == Open ==
    /// Builds the configured backend and rehydrates it from the configured
    /// snapshot path. A missing snapshot yields an empty store.
    pub async fn open(config: &Config) -> Result<Self> {
        let db = Self::with_backend(config.backend, Arc::new(SystemClock));
        db.load_snapshot(&config.snapshot_path).await?;
        Ok(db)
    }

    pub async fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        ttl_seconds: Option<u64>,
    ) {
        self.inner
            .lock()
            .await
            .set(key.into(), value.into(), ttl_seconds);
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().await.get(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.inner.lock().await.delete(key)
    }

    pub async fn sweep_expired(&self) -> usize {
        self.inner.lock().await.sweep_expired()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    // == Save Snapshot ==
    /// Captures the current state and writes it to `path`.
    ///
    /// The store lock is held only while capturing; the write happens on
    /// the blocking pool. The save lock travels with the write, so it is
    /// released only once the file is in place, even if this future is
    /// dropped first. A failed write leaves the in-memory state untouched.
    pub async fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let save_guard = self.save_lock.clone().lock_owned().await;
        let snapshot = self.inner.lock().await.export();
        let path = path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || {
            let _save_guard = save_guard;
            snapshot::save(&snapshot, &path)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }

    // == Load Snapshot ==
    /// Replaces the current state with the snapshot at `path`.
    ///
    /// The file is read and parsed before the lock is taken, so a missing
    /// or malformed snapshot never disturbs the live store.
    pub async fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let read_path = path.clone();

        let parsed: Option<Snapshot> =
            tokio::task::spawn_blocking(move || snapshot::load(&read_path))
                .await
                .map_err(|e| StoreError::TaskFailed(e.to_string()))??;

        let Some(snapshot) = parsed else {
            return Ok(LoadOutcome::NotFound);
        };

        let outcome = self.inner.lock().await.restore(snapshot);
        if let LoadOutcome::Loaded { restored, dropped } = outcome {
            info!(
                "Snapshot loaded from {} ({} entries restored, {} expired entries dropped)",
                path.display(),
                restored,
                dropped
            );
        }
        Ok(outcome)
    }
}
