//! Cache Entry Module
//!
//! Defines the metadata-carrying wrapper stored by age- and usage-aware policies.

use std::time::Duration;

// == Cache Entry ==
/// Represents a single cache entry with value and access metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Timestamp of the most recent hit (Unix milliseconds)
    pub last_accessed: u64,
    /// Number of hits served by this entry
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry stamped with `now_ms`.
    pub fn new(value: V, now_ms: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            last_accessed: now_ms,
            access_count: 0,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since insertion. Never negative, even if the
    /// clock moved backwards.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry is expired only once its age is strictly
    /// greater than the TTL. At exactly `created_at + ttl` it is still live.
    pub fn is_expired(&self, ttl: Duration, now_ms: u64) -> bool {
        self.age_ms(now_ms) > ttl.as_millis() as u64
    }

    // == Time To Live ==
    /// Remaining lifetime under `ttl`, saturating at zero.
    pub fn ttl_remaining(&self, ttl: Duration, now_ms: u64) -> Duration {
        let ttl_ms = ttl.as_millis() as u64;
        Duration::from_millis(ttl_ms.saturating_sub(self.age_ms(now_ms)))
    }

    // == Touch ==
    /// Records a hit.
    pub fn touch(&mut self, now_ms: u64) {
        self.last_accessed = now_ms;
        self.access_count += 1;
    }
}
