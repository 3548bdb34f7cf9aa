//! Monitored Cache Module
//!
//! Bounded cache that records aggregate and per-key usage and renders a
//! report of the most accessed keys.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::cache::{Cache, CacheEntry, CacheStats, Clock, FifoStore, SystemClock};
use crate::error::Result;

/// Capacity used by [`MonitoredCache::default`].
pub const DEFAULT_MONITORED_MAX_SIZE: usize = 10_000;

/// Number of keys listed in [`MonitorReport::top_keys`].
pub const TOP_KEYS: usize = 5;

// == Key Stats ==
/// Usage counters for one resident key. Dropped with the key's entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyStats {
    pub hits: u64,
    pub sets: u64,
    /// Position of the key's first `set`, used to break ties stably
    #[serde(skip)]
    first_seen: u64,
}

// == Report ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyHits<K> {
    pub key: K,
    pub hits: u64,
}

/// Snapshot rendered by [`MonitoredCache::report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorReport<K> {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
    pub entries: usize,
    pub max_size: usize,
    /// Up to five keys, most hit first; ties keep first-seen order
    pub top_keys: Vec<KeyHits<K>>,
}

impl<K: fmt::Display> fmt::Display for MonitorReport<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache Monitor Report")?;
        writeln!(f, "  entries:   {}/{}", self.entries, self.max_size)?;
        writeln!(f, "  sets:      {}", self.stats.sets)?;
        writeln!(f, "  gets:      {}", self.stats.gets)?;
        writeln!(f, "  hits:      {}", self.stats.hits)?;
        writeln!(f, "  misses:    {}", self.stats.misses)?;
        writeln!(f, "  evictions: {}", self.stats.evictions)?;
        writeln!(f, "  hit rate:  {:.2}%", self.hit_rate * 100.0)?;
        writeln!(f, "Top keys:")?;
        for (rank, entry) in self.top_keys.iter().enumerate() {
            writeln!(f, "  {}. {} ({} hits)", rank + 1, entry.key, entry.hits)?;
        }
        Ok(())
    }
}

// == Monitored Cache ==
#[derive(Debug)]
pub struct MonitoredCache<K, V, C = SystemClock> {
    entries: FifoStore<K, CacheEntry<V>>,
    stats: CacheStats,
    per_key: HashMap<K, KeyStats>,
    /// Next first-seen position handed to a newly tracked key
    next_seen: u64,
    clock: C,
}

impl<K, V> MonitoredCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    pub fn new(max_size: usize) -> Result<Self> {
        Self::with_clock(max_size, SystemClock)
    }
}

impl<K, V> Default for MonitoredCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self {
            entries: FifoStore::new(DEFAULT_MONITORED_MAX_SIZE)
                .expect("default capacity is positive"),
            stats: CacheStats::new(),
            per_key: HashMap::new(),
            next_seen: 0,
            clock: SystemClock,
        }
    }
}

impl<K, V, C> MonitoredCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    pub fn with_clock(max_size: usize, clock: C) -> Result<Self> {
        Ok(Self {
            entries: FifoStore::new(max_size)?,
            stats: CacheStats::new(),
            per_key: HashMap::new(),
            next_seen: 0,
            clock,
        })
    }

    // == Set ==
    /// Stores a fresh entry. A new key arriving at capacity evicts the
    /// oldest inserted entry and counts an eviction.
    pub fn set(&mut self, key: K, value: V) {
        let entry = CacheEntry::new(value, self.clock.now_ms());

        if let Some((evicted, _)) = self.entries.set(key.clone(), entry) {
            self.per_key.remove(&evicted);
            self.stats.record_eviction();
            debug!(
                evictions = self.stats.evictions,
                "Monitored cache evicted oldest entry"
            );
        }

        self.stats.record_set();
        let next_seen = &mut self.next_seen;
        let key_stats = self.per_key.entry(key).or_insert_with(|| {
            *next_seen += 1;
            KeyStats {
                first_seen: *next_seen,
                ..KeyStats::default()
            }
        });
        key_stats.sets += 1;
    }

    // == Get ==
    /// Counts the lookup, and on a hit touches the entry and its key stats.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch(now);
                let value = entry.value.clone();
                self.stats.record_hit();
                if let Some(key_stats) = self.per_key.get_mut(key) {
                    key_stats.hits += 1;
                }
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes the entry together with its per-key stats.
    pub fn delete(&mut self, key: &K) -> bool {
        self.per_key.remove(key);
        self.entries.delete(key).is_some()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn key_stats(&self, key: &K) -> Option<KeyStats> {
        self.per_key.get(key).copied()
    }

    /// Number of keys with per-key stats. Never exceeds `len()`.
    pub fn tracked_keys(&self) -> usize {
        self.per_key.len()
    }

    /// Metadata of a live entry (value excluded). Not counted as a get.
    pub fn entry_metadata(&self, key: &K) -> Option<(u64, u64, u64)> {
        self.entries
            .get_ref(key)
            .map(|e| (e.created_at, e.last_accessed, e.access_count))
    }

    // == Report ==
    /// Aggregate counters plus the five most hit keys.
    pub fn report(&self) -> MonitorReport<K> {
        let mut ranked: Vec<(&K, &KeyStats)> = self.per_key.iter().collect();
        ranked.sort_by_key(|(_, s)| s.first_seen);
        // Stable: equal hit counts stay in first-seen order
        ranked.sort_by(|(_, a), (_, b)| b.hits.cmp(&a.hits));

        MonitorReport {
            stats: self.stats.clone(),
            hit_rate: self.stats.hit_rate(),
            entries: self.entries.len(),
            max_size: self.entries.capacity(),
            top_keys: ranked
                .into_iter()
                .take(TOP_KEYS)
                .map(|(key, s)| KeyHits {
                    key: key.clone(),
                    hits: s.hits,
                })
                .collect(),
        }
    }
}

impl<K, V, C> Cache<K, V> for MonitoredCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    fn set(&mut self, key: K, value: V) {
        MonitoredCache::set(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        MonitoredCache::get(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        MonitoredCache::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        MonitoredCache::contains(self, key)
    }

    fn len(&self) -> usize {
        MonitoredCache::len(self)
    }
}
