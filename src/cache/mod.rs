//! Cache Module
//!
//! Provides a typed in-memory cache with per-entry TTL and batched expiry.

mod entry;
mod fetch;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fetch::get_or_fetch;
pub use stats::CacheStats;
pub use store::TtlCache;
