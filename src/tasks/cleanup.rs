//! Expired Entry Purge Task
//!
//! Background task that periodically drops stale cache entries so they stop
//! occupying capacity until LRU pressure pushes them out.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that purges expired entries every `interval`.
///
/// The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "starting cache purge task");

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.write().await.purge_expired();

            if removed > 0 {
                info!(removed, "purged expired cache entries");
            } else {
                debug!("no expired cache entries");
            }
        }
    })
}
