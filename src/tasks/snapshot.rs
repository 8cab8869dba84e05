//! Snapshot Task
//!
//! Background task that periodically persists the store to disk.

use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::db::Db;

/// Spawns a background task that saves a snapshot every interval.
///
/// A failed save is logged and retried on the next tick; it never stops
/// the task or touches the in-memory state.
pub fn spawn_snapshot_task(db: Db, path: PathBuf, snapshot_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(snapshot_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting snapshot task for {} with interval of {} seconds",
            path.display(),
            snapshot_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            if let Err(err) = db.save_snapshot(&path).await {
                warn!("Periodic snapshot failed: {}", err);
            }
        }
    })
}
