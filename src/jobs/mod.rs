//! Scheduled Maintenance Jobs
//!
//! Independent, idempotent background jobs: a read-only count of incomplete
//! tasks, a bulk delete of completed ones, and an expired-cache sweep. The
//! task jobs deliberately run without owner scoping (they are system-wide
//! administrative operations, not user-facing ones) and neither goes through
//! the creation notifier.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::store::TaskStore;

// == Job Bodies ==
/// Counts tasks with `completed == false` across all owners.
///
/// Read-only and always safe to re-run.
pub async fn count_incomplete_tasks(tasks: &RwLock<TaskStore>) -> usize {
    let count = tasks.read().await.count_incomplete();
    info!("REPORT: {count} incomplete tasks pending");
    count
}

/// Deletes tasks with `completed == true` across all owners.
///
/// Returns the number of rows removed; a second immediate run removes zero.
pub async fn delete_completed_tasks(tasks: &RwLock<TaskStore>) -> usize {
    let removed = tasks.write().await.delete_completed();
    if removed > 0 {
        info!("Cleanup: deleted {removed} completed tasks");
    } else {
        debug!("Cleanup: no completed tasks to delete");
    }
    removed
}

// == Schedulers ==
/// Spawns the periodic incomplete-task count job.
///
/// Returns a JoinHandle so the task can be aborted on graceful shutdown.
pub fn spawn_count_incomplete_job(
    tasks: Arc<RwLock<TaskStore>>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting incomplete-task count job with interval of {interval_secs} seconds");

        loop {
            tokio::time::sleep(interval).await;
            count_incomplete_tasks(&tasks).await;
        }
    })
}

/// Spawns the periodic completed-task cleanup job.
pub fn spawn_delete_completed_job(
    tasks: Arc<RwLock<TaskStore>>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting completed-task cleanup job with interval of {interval_secs} seconds");

        loop {
            tokio::time::sleep(interval).await;
            delete_completed_tasks(&tasks).await;
        }
    })
}

/// Spawns the periodic expired-cache-entry sweep.
///
/// `ResponseCache::get` already drops expired entries on read; this sweep
/// reclaims entries that are never read again.
pub fn spawn_cache_cleanup_job(
    cache: Arc<RwLock<ResponseCache>>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting cache cleanup job with interval of {interval_secs} seconds");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.cleanup_expired();
            if removed > 0 {
                info!("Cache cleanup: removed {removed} expired entries");
            } else {
                debug!("Cache cleanup: no expired entries found");
            }
        }
    })
}
