//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;

/// Shortest sweep period; tokio intervals reject zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a background task that sweeps expired entries out of `cache`.
///
/// A zero `interval` is raised to one millisecond.
/// Every `interval` the task takes the cache's write lock and removes every
/// expired entry. It stops when `shutdown` is cancelled; the returned handle
/// resolves once it has.
///
/// # Example
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let cache: TtlCache<String> = TtlCache::new();
/// let handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60), shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweep_task<V>(
    cache: TtlCache<V>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let interval = if interval.is_zero() {
        warn!("TTL sweep interval of zero raised to {:?}", MIN_INTERVAL);
        MIN_INTERVAL
    } else {
        interval
    };

    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("TTL sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.cleanup_expired().await;

                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }
    })
}
