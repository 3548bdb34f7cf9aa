//! LRU Cache Module
//!
//! Implements Least Recently Used tracking and the bounded cache built on it.

use std::collections::VecDeque;
use std::hash::Hash;

use tracing::debug;

use crate::cache::{Cache, KeyValueStore};
use crate::error::{CacheError, Result};

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are stored in a VecDeque where:
/// - Front = Least recently used
/// - Back = Most recently used
#[derive(Debug, Clone)]
pub struct LruTracker<K> {
    /// Order of keys by access time
    order: VecDeque<K>,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: PartialEq> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used (moves it to the back).
    pub fn touch(&mut self, key: K) {
        self.remove(&key);
        self.order.push_back(key);
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.front()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }

    /// Keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}

// == LRU Cache ==
/// Bounded cache evicting the least recently used key on overflow.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    entries: KeyValueStore<K, V>,
    lru: LruTracker<K>,
    max_size: usize,
    evictions: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `max_size` entries.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "LRU max_size must be positive".to_string(),
            ));
        }

        Ok(Self {
            entries: KeyValueStore::new(),
            lru: LruTracker::new(),
            max_size,
            evictions: 0,
        })
    }

    // == Set ==
    /// Stores a key-value pair, marking it most recently used.
    ///
    /// Inserting a new key into a full cache evicts exactly one entry, the
    /// least recently used. Returns that entry.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        let mut evicted = None;

        if self.entries.contains(&key) {
            self.lru.remove(&key);
        } else if self.entries.len() >= self.max_size {
            if let Some(oldest) = self.lru.evict_oldest() {
                if let Some(old_value) = self.entries.delete(&oldest) {
                    self.evictions += 1;
                    debug!(
                        evictions = self.evictions,
                        "LRU cache evicted least recently used entry"
                    );
                    evicted = Some((oldest, old_value));
                }
            }
        }

        self.entries.set(key.clone(), value);
        self.lru.touch(key);
        evicted
    }

    // == Get ==
    /// Retrieves a value and marks the key most recently used.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let value = self.entries.get(key)?;
        self.lru.touch(key.clone());
        Some(value)
    }

    // == Peek ==
    /// Reads a value without changing its recency.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.entries.get(key)
    }

    // == Delete ==
    pub fn delete(&mut self, key: &K) -> bool {
        if self.entries.delete(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
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

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.lru.iter()
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn set(&mut self, key: K, value: V) {
        LruCache::set(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        LruCache::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }
}
