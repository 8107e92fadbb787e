//! Feeds Module
//!
//! External sources shown on the home page, each served through its own
//! [`TtlCache`] so slow upstreams are hit at most once per TTL window.

mod commits;
mod status;

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::cache::{get_or_fetch, CacheStats, TtlCache};
use crate::config::{Config, FeedConfig};
use crate::error::{AppError, Result};

pub use commits::{fetch_commits, format_commit_date, parse_commits, Commit};
pub use status::{fetch_status, StatusMap};

/// Fixed cache key for the commit history.
pub const COMMITS_KEY: &str = "commits";

/// Statistics of every cache the feed service owns.
#[derive(Debug, Clone, Serialize)]
pub struct FeedCacheStats {
    pub status: CacheStats,
    pub commits: CacheStats,
}

// == Feed Service ==
/// Fetches home page sections through per-type caches.
#[derive(Debug, Clone)]
pub struct FeedService {
    client: reqwest::Client,
    feeds: FeedConfig,
    ttl: Duration,
    timeout: Duration,
    status_cache: TtlCache<StatusMap>,
    commit_cache: TtlCache<Vec<Commit>>,
}

impl FeedService {
    /// Builds the service around caches owned by the caller.
    pub fn new(
        config: &Config,
        status_cache: TtlCache<StatusMap>,
        commit_cache: TtlCache<Vec<Commit>>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.upstream_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            feeds: config.feeds.clone(),
            ttl: config.cache_ttl(),
            timeout: config.upstream_timeout(),
            status_cache,
            commit_cache,
        })
    }

    /// Current status, or `None` when no status source is configured.
    pub async fn status(&self) -> Result<Option<StatusMap>> {
        let Some(url) = self.feeds.status_url.as_deref() else {
            return Ok(None);
        };

        let status = get_or_fetch(&self.status_cache, url, self.ttl, self.timeout, || {
            info!("Fetching {}", url);
            fetch_status(&self.client, url)
        })
        .await?;
        Ok(Some(status))
    }

    /// Recent commits, or `None` when no commit query is configured.
    pub async fn commits(&self) -> Result<Option<Vec<Commit>>> {
        let Some(query) = self.feeds.github_query.as_deref() else {
            return Ok(None);
        };

        let commits = get_or_fetch(&self.commit_cache, COMMITS_KEY, self.ttl, self.timeout, || {
            info!("Fetching commits");
            fetch_commits(
                &self.client,
                &self.feeds.github_api_url,
                &self.feeds.github_token,
                query,
            )
        })
        .await?;
        Ok(Some(commits))
    }

    pub async fn stats(&self) -> FeedCacheStats {
        FeedCacheStats {
            status: self.status_cache.stats().await,
            commits: self.commit_cache.stats().await,
        }
    }
}
