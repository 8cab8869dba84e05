//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the store is live.
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired entries at a configured interval
//! - Snapshot: Writes the store to disk at a configured interval

mod cleanup;
mod snapshot;

pub use cleanup::spawn_cleanup_task;
pub use snapshot::spawn_snapshot_task;
