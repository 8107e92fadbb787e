//! Le Monolithe - personal website backend
//!
//! Aggregates slow external feeds for the home page behind an in-memory TTL cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod feeds;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::Config;
pub use tasks::spawn_sweep_task;
