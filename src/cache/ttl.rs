//! TTL Cache Module
//!
//! Expires entries by absolute age. Expiry is lazy: stale entries are removed
//! when a `get` touches them or when `cleanup_expired` sweeps the store.

use std::hash::Hash;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::cache::{Cache, CacheEntry, Clock, KeyValueStore, SystemClock};

/// Default time-to-live applied by [`TtlCache::default`].
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

// == TTL Stats ==
/// Classification of stored entries at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TtlStats {
    /// Entries physically stored
    pub total: usize,
    /// Entries still within their TTL
    pub valid: usize,
    /// Entries past their TTL but not yet removed
    pub expired: usize,
    /// Configured TTL in milliseconds
    pub ttl_ms: u64,
}

// == TTL Cache ==
/// Cache whose entries expire `ttl` after they were last set.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    entries: KeyValueStore<K, CacheEntry<V>>,
    ttl: Duration,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates a cache backed by the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V> Default for TtlCache<K, V, SystemClock>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    C: Clock,
{
    /// Creates a cache driven by `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: KeyValueStore::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Set ==
    /// Stores `value`; an overwrite restarts the entry's lifetime.
    pub fn set(&mut self, key: K, value: V) {
        let entry = CacheEntry::new(value, self.clock.now_ms());
        self.entries.set(key, entry);
    }

    // == Get ==
    /// Returns the value if present and not expired. An expired entry is
    /// removed on the spot and reported as a miss.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();
        let ttl = self.ttl;
        let entry = self.entries.get_mut(key)?;

        if entry.is_expired(ttl, now) {
            self.entries.delete(key);
            debug!("TTL cache dropped expired entry on access");
            return None;
        }

        entry.touch(now);
        Some(entry.value.clone())
    }

    // == Delete ==
    pub fn delete(&mut self, key: &K) -> bool {
        self.entries.delete(key).is_some()
    }

    // == Has ==
    /// Whether `key` holds a live entry. Expired entries are reported absent
    /// but left in place.
    pub fn contains(&self, key: &K) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get_ref(key)
            .is_some_and(|entry| !entry.is_expired(self.ttl, now))
    }

    // == Count ==
    /// Raw number of stored entries, including any not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get_ref(key)
            .filter(|entry| !entry.is_expired(self.ttl, now))
            .map(|entry| entry.ttl_remaining(self.ttl, now))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl, now))
    }

    // == Stats ==
    /// Classifies stored entries as valid or expired without removing any.
    pub fn stats(&self) -> TtlStats {
        let now = self.clock.now_ms();
        let expired = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl, now))
            .count();
        let total = self.entries.len();

        TtlStats {
            total,
            valid: total - expired,
            expired,
            ttl_ms: self.ttl.as_millis() as u64,
        }
    }
}

impl<K, V, C> Cache<K, V> for TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    fn set(&mut self, key: K, value: V) {
        TtlCache::set(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        TtlCache::get(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        TtlCache::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        TtlCache::contains(self, key)
    }

    fn len(&self) -> usize {
        TtlCache::len(self)
    }
}
