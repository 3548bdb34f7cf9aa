//! Multi-Level Cache Module
//!
//! Two bounded FIFO tiers: a small L1 in front of a larger L2. Writes go to
//! both; an L2 hit promotes the entry back into L1.

use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::stats::ratio;
use crate::cache::{Cache, FifoStore};
use crate::error::{CacheError, Result};

// == Multi-Level Stats ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiLevelStats {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub misses: u64,
    pub l1_entries: usize,
    pub l2_entries: usize,
    /// (l1_hits + l2_hits) / lookups, 0.0 before the first lookup
    pub hit_rate: f64,
}

// == Multi-Level Cache ==
#[derive(Debug, Clone)]
pub struct MultiLevelCache<K, V> {
    l1: FifoStore<K, V>,
    l2: FifoStore<K, V>,
    l1_hits: u64,
    l2_hits: u64,
    misses: u64,
}

impl<K, V> MultiLevelCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates the two tiers. Both sizes must be positive.
    pub fn new(l1_max_size: usize, l2_max_size: usize) -> Result<Self> {
        if l1_max_size == 0 || l2_max_size == 0 {
            return Err(CacheError::InvalidConfig(format!(
                "Tier sizes must be positive (l1={l1_max_size}, l2={l2_max_size})"
            )));
        }
        if l1_max_size > l2_max_size {
            warn!(l1_max_size, l2_max_size, "L1 is larger than L2");
        }

        Ok(Self {
            l1: FifoStore::new(l1_max_size)?,
            l2: FifoStore::new(l2_max_size)?,
            l1_hits: 0,
            l2_hits: 0,
            misses: 0,
        })
    }

    // == Set ==
    /// Writes to both tiers; each evicts its own oldest entry when full.
    pub fn set(&mut self, key: K, value: V) {
        self.l1.set(key.clone(), value.clone());
        self.l2.set(key, value);
    }

    // == Get ==
    /// Looks in L1, then L2. An L2 hit is copied into L1 before returning.
    pub fn get(&mut self, key: &K) -> Option<V> {
        if let Some(value) = self.l1.get(key) {
            self.l1_hits += 1;
            return Some(value);
        }

        match self.l2.get(key) {
            Some(value) => {
                self.l2_hits += 1;
                self.l1.set(key.clone(), value.clone());
                debug!("Promoted L2 hit into L1");
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key` from both tiers.
    pub fn delete(&mut self, key: &K) -> bool {
        let in_l1 = self.l1.delete(key).is_some();
        let in_l2 = self.l2.delete(key).is_some();
        in_l1 || in_l2
    }

    pub fn contains(&self, key: &K) -> bool {
        self.l1.contains(key) || self.l2.contains(key)
    }

    pub fn in_l1(&self, key: &K) -> bool {
        self.l1.contains(key)
    }

    pub fn in_l2(&self, key: &K) -> bool {
        self.l2.contains(key)
    }

    /// Distinct keys resident in either tier.
    pub fn len(&self) -> usize {
        let l1_only = self.l1.keys().filter(|k| !self.l2.contains(k)).count();
        self.l2.len() + l1_only
    }

    pub fn is_empty(&self) -> bool {
        self.l1.is_empty() && self.l2.is_empty()
    }

    // == Stats ==
    pub fn stats(&self) -> MultiLevelStats {
        let hits = self.l1_hits + self.l2_hits;
        MultiLevelStats {
            l1_hits: self.l1_hits,
            l2_hits: self.l2_hits,
            misses: self.misses,
            l1_entries: self.l1.len(),
            l2_entries: self.l2.len(),
            hit_rate: ratio(hits, hits + self.misses),
        }
    }
}

impl<K, V> Cache<K, V> for MultiLevelCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn set(&mut self, key: K, value: V) {
        MultiLevelCache::set(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        MultiLevelCache::get(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        MultiLevelCache::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        MultiLevelCache::contains(self, key)
    }

    fn len(&self) -> usize {
        MultiLevelCache::len(self)
    }
}
