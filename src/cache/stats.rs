//! Cache Statistics Module
//!
//! Tracks aggregate cache counters: sets, gets, hits, misses and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Aggregate cache performance counters.
///
/// Every `get` is recorded as exactly one hit or one miss, so
/// `hits + misses == gets` holds at all times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of `set` calls
    pub sets: u64,
    /// Number of `get` calls
    pub gets: u64,
    /// Number of successful retrievals
    pub hits: u64,
    /// Number of failed retrievals (absent, expired or evicted)
    pub misses: u64,
    /// Number of entries evicted under capacity pressure
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates hits / gets, or 0.0 if no gets have been made.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.gets)
    }

    // == Record Set ==
    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    // == Record Hit ==
    /// Counts a get that found a live value.
    pub fn record_hit(&mut self) {
        self.gets += 1;
        self.hits += 1;
    }

    // == Record Miss ==
    /// Counts a get that found nothing.
    pub fn record_miss(&mut self) {
        self.gets += 1;
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

/// `part / total`, defined as 0.0 for an empty total.
pub(crate) fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
