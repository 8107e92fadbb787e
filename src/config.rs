//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// GitHub GraphQL endpoint used when `GITHUB_API_URL` is not set.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com/graphql";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds applied to every cached upstream response
    pub cache_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Upper bound in seconds on a single upstream fetch
    pub upstream_timeout: u64,
    /// External feed endpoints
    pub feeds: FeedConfig,
}

/// Where the home page sections come from. A section without a source is omitted.
#[derive(Debug, Clone, Default)]
pub struct FeedConfig {
    /// JSON status document (object of strings)
    pub status_url: Option<String>,
    /// GraphQL endpoint queried for commit history
    pub github_api_url: String,
    /// Bearer token for the GraphQL endpoint
    pub github_token: String,
    /// Commit-history query sent to the GraphQL endpoint
    pub github_query: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 3600)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 3600)
    /// - `UPSTREAM_TIMEOUT` - Upstream fetch bound in seconds (default: 10)
    /// - `STATUS_CAFE_URL` - Status JSON URL (default: unset)
    /// - `GITHUB_API_URL` - GraphQL endpoint (default: GitHub's)
    /// - `GITHUB_TOKEN` - GraphQL bearer token (default: empty)
    /// - `GITHUB_GRAPHQL_QUERY` - Commit-history query (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("PORT").unwrap_or(defaults.server_port),
            cache_ttl: parse_env("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            sweep_interval: parse_env("CACHE_SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            upstream_timeout: parse_env("UPSTREAM_TIMEOUT").unwrap_or(defaults.upstream_timeout),
            feeds: FeedConfig {
                status_url: non_empty_env("STATUS_CAFE_URL"),
                github_api_url: non_empty_env("GITHUB_API_URL")
                    .unwrap_or(defaults.feeds.github_api_url),
                github_token: env::var("GITHUB_TOKEN").unwrap_or_default(),
                github_query: non_empty_env("GITHUB_GRAPHQL_QUERY"),
            },
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        // tokio intervals panic on a zero period
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_ttl: 3600,
            sweep_interval: 3600,
            upstream_timeout: 10,
            feeds: FeedConfig {
                github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
                ..Default::default()
            },
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
