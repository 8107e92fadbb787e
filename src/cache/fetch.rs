//! Cache-aside helper
//!
//! Serves a value from a [`TtlCache`] or, on a miss, fetches it from the
//! upstream under a deadline and stores it.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::error::{AppError, Result};

/// Returns the cached value for `key`, or runs `fetch` and caches its result for `ttl`.
///
/// The upstream call is bounded by `timeout`. Failed or timed-out fetches
/// leave the cache untouched so the next request retries.
pub async fn get_or_fetch<V, F, Fut>(
    cache: &TtlCache<V>,
    key: &str,
    ttl: Duration,
    timeout: Duration,
    fetch: F,
) -> Result<V>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V>>,
{
    if let Some(value) = cache.get(key).await {
        debug!("Cache hit for {}", key);
        return Ok(value);
    }

    let value = match tokio::time::timeout(timeout, fetch()).await {
        Ok(result) => result?,
        Err(_) => {
            warn!("Upstream fetch for {} exceeded {:?}", key, timeout);
            return Err(AppError::UpstreamTimeout(key.to_string()));
        }
    };

    cache.set(key, value.clone(), ttl).await;
    Ok(value)
}
