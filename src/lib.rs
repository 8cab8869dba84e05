//! TTL KV - An in-memory key/value store with per-key expiration
//!
//! Entries may carry a time-to-live; expired entries are removed lazily on
//! read and proactively by a sweep. The whole store can be saved to and
//! restored from a JSON snapshot.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod snapshot;
pub mod tasks;

pub use cache::{Backend, BackendKind};
pub use config::Config;
pub use db::Db;
pub use error::{Result, StoreError};
pub use snapshot::LoadOutcome;
pub use tasks::{spawn_cleanup_task, spawn_snapshot_task};
