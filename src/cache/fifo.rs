//! FIFO Store Module
//!
//! Bounded store that evicts the oldest inserted key. Used as the tier
//! substrate by the multi-level and monitored caches.

use std::collections::VecDeque;
use std::hash::Hash;

use tracing::debug;

use crate::cache::KeyValueStore;
use crate::error::{CacheError, Result};

// == FIFO Store ==
/// Bounded key-value store with first-in, first-out eviction.
///
/// Overwriting an existing key replaces its value but keeps its original
/// position in the insertion order.
#[derive(Debug, Clone)]
pub struct FifoStore<K, V> {
    entries: KeyValueStore<K, V>,
    /// Insertion order, oldest at the front
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> FifoStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "FIFO capacity must be positive".to_string(),
            ));
        }

        Ok(Self {
            entries: KeyValueStore::new(),
            order: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    // == Set ==
    /// Inserts or overwrites `key`. Returns the entry evicted to make room,
    /// if any.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.entries.contains(&key) {
            self.entries.set(key, value);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.pop_oldest()
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.entries.set(key, value);
        evicted
    }

    fn pop_oldest(&mut self) -> Option<(K, V)> {
        let oldest = self.order.pop_front()?;
        let value = self.entries.delete(&oldest)?;
        debug!("FIFO store evicted oldest entry");
        Some((oldest, value))
    }

    // == Get ==
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub(crate) fn get_ref(&self, key: &K) -> Option<&V> {
        self.entries.get_ref(key)
    }

    // == Delete ==
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let value = self.entries.delete(key)?;
        self.order.retain(|k| k != key);
        Some(value)
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

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}
