//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::config::Config;
use crate::error::Result;
use crate::feeds::FeedService;
use crate::models::{HealthResponse, HomeResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached access to the external feeds
    pub feeds: Arc<FeedService>,
}

impl AppState {
    /// Creates a new AppState around an existing feed service.
    pub fn new(feeds: FeedService) -> Self {
        Self {
            feeds: Arc::new(feeds),
        }
    }

    /// Creates a new AppState with fresh, unswept caches.
    ///
    /// Used where no background sweep is wanted, such as tests.
    pub fn from_config(config: &Config) -> Result<Self> {
        let feeds = FeedService::new(config, Default::default(), Default::default())?;
        Ok(Self::new(feeds))
    }
}

/// Handler for GET / and GET /api/home
///
/// Fetches every configured section concurrently; any upstream failure fails the page.
pub async fn home_handler(State(state): State<AppState>) -> Result<Json<HomeResponse>> {
    let (status, commits) = tokio::try_join!(state.feeds.status(), state.feeds.commits())?;

    Ok(Json(HomeResponse { status, commits }))
}

/// Handler for GET /stats
///
/// Returns statistics of every feed cache.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.feeds.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_home_handler_without_sources() {
        let state = AppState::from_config(&Config::default()).unwrap();

        let response = home_handler(State(state)).await.unwrap();
        assert!(response.status.is_none());
        assert!(response.commits.is_none());
    }

    #[tokio::test]
    async fn test_home_handler_upstream_failure() {
        let mut config = Config::default();
        config.feeds.status_url = Some("http://127.0.0.1:1/status.json".to_string());
        let state = AppState::from_config(&config).unwrap();

        assert!(home_handler(State(state)).await.is_err());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = AppState::from_config(&Config::default()).unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.status.hits, 0);
        assert_eq!(response.commits.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
