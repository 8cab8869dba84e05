//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries, so keys that
//! are never read again still get reclaimed.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::db::Db;

/// Spawns a background task that periodically removes expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep holds the store lock only for its own duration.
///
/// # Arguments
/// * `db` - Shared store handle
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let db = Db::with_backend(BackendKind::Indexed, Arc::new(SystemClock));
/// let cleanup_handle = spawn_cleanup_task(db.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(db: Db, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = db.sweep_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
