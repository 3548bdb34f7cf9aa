//! Sharded Cache Module
//!
//! Partitions the key space across a fixed number of independent stores.
//! Routing is a pure function of the key, so a key never changes shard for
//! the lifetime of the cache.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::cache::{Cache, KeyValueStore};
use crate::error::{CacheError, Result};

// == Shard Selector ==
/// Deterministic key → shard mapping using a seeded hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector over `shards` partitions. Zero shards is rejected.
    pub fn new(shards: usize, seed: u64) -> Result<Self> {
        if shards == 0 {
            return Err(CacheError::InvalidConfig(
                "shard_count must be positive".to_string(),
            ));
        }
        Ok(Self { shards, seed })
    }

    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps a key to a shard index in `[0, shards)`.
    pub fn shard_for_key<K: Hash + ?Sized>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() % self.shards as u64) as usize
    }
}

// == Shard Snapshot ==
/// Diagnostic view of one shard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardSnapshot<K> {
    pub index: usize,
    pub count: usize,
    pub keys: Vec<K>,
}

// == Sharded Cache ==
#[derive(Debug, Clone)]
pub struct ShardedCache<K, V> {
    shards: Vec<KeyValueStore<K, V>>,
    selector: ShardSelector,
}

impl<K, V> ShardedCache<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates `shard_count` empty shards routed with seed 0.
    pub fn new(shard_count: usize) -> Result<Self> {
        Self::with_seed(shard_count, 0)
    }

    pub fn with_seed(shard_count: usize, seed: u64) -> Result<Self> {
        let selector = ShardSelector::new(shard_count, seed)?;
        let shards = (0..shard_count).map(|_| KeyValueStore::new()).collect();
        Ok(Self { shards, selector })
    }

    pub fn shard_count(&self) -> usize {
        self.selector.shard_count()
    }

    /// Index of the shard that owns `key`.
    pub fn shard_for(&self, key: &K) -> usize {
        self.selector.shard_for_key(key)
    }

    fn shard_mut(&mut self, key: &K) -> &mut KeyValueStore<K, V> {
        let index = self.shard_for(key);
        &mut self.shards[index]
    }

    fn shard(&self, key: &K) -> &KeyValueStore<K, V> {
        &self.shards[self.shard_for(key)]
    }

    // == Set / Get / Delete ==
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.shard_mut(&key).set(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).get(key)
    }

    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.shard_mut(key).delete(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).contains(key)
    }

    /// Total entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(KeyValueStore::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(KeyValueStore::is_empty)
    }

    // == Distribution ==
    /// Per-shard entry counts and keys, in shard order.
    pub fn distribution(&self) -> Vec<ShardSnapshot<K>>
    where
        K: Clone,
    {
        self.shards
            .iter()
            .enumerate()
            .map(|(index, shard)| ShardSnapshot {
                index,
                count: shard.len(),
                keys: shard.keys().cloned().collect(),
            })
            .collect()
    }
}

impl<K, V> Cache<K, V> for ShardedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn set(&mut self, key: K, value: V) {
        ShardedCache::set(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        ShardedCache::get(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        ShardedCache::delete(self, key).is_some()
    }

    fn contains(&self, key: &K) -> bool {
        ShardedCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ShardedCache::len(self)
    }
}
