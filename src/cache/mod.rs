//! Cache Module
//!
//! Provides an in-memory description cache with TTL freshness and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

/// Cache handle shared between lookups and the purge task.
pub type SharedCache = Arc<RwLock<CacheStore>>;
