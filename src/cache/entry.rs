//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with freshness checks.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached description together with the moment it was inserted.
///
/// `inserted_at` is fixed at construction; refreshing a key replaces the
/// whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored description
    pub value: String,
    inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: String) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Moment the entry was inserted.
    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    // == Is Expired ==
    /// Checks whether the entry is stale under `ttl`.
    ///
    /// Boundary condition: an entry is stale once `now - inserted_at >= ttl`,
    /// so a zero TTL makes every entry stale on its first read.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Time elapsed since insertion.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.inserted_at)
    }
}
