//! Write-Through Cache Module
//!
//! Pairs a fast cache map with a slower backing store. Writes reach both
//! before returning; reads fall back to the store and refill the cache.

use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::KeyValueStore;
use crate::error::Result;

// == Backing Store ==
/// The slower tier behind a [`WriteThroughCache`].
pub trait BackingStore<K, V> {
    /// Persists `value` under `key`.
    fn write(&mut self, key: K, value: V) -> Result<()>;

    /// Reads a copy of the persisted value.
    fn read(&self, key: &K) -> Option<V>;

    /// Removes `key`; a no-op when absent.
    fn remove(&mut self, key: &K) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory backing store standing in for a persistent tier.
#[derive(Debug, Clone)]
pub struct MemoryBackingStore<K, V> {
    data: KeyValueStore<K, V>,
}

impl<K, V> Default for MemoryBackingStore<K, V> {
    fn default() -> Self {
        Self {
            data: KeyValueStore::default(),
        }
    }
}

impl<K: Eq + Hash, V> MemoryBackingStore<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V> BackingStore<K, V> for MemoryBackingStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn write(&mut self, key: K, value: V) -> Result<()> {
        self.data.set(key, value);
        Ok(())
    }

    fn read(&self, key: &K) -> Option<V> {
        self.data.get(key)
    }

    fn remove(&mut self, key: &K) -> Result<()> {
        self.data.delete(key);
        Ok(())
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

// == Write-Through Stats ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteThroughStats {
    pub writes: u64,
    pub reads: u64,
    pub cache_hits: u64,
    pub store_hits: u64,
    pub misses: u64,
    pub cached_entries: usize,
    pub stored_entries: usize,
}

// == Write-Through Cache ==
#[derive(Debug, Clone)]
pub struct WriteThroughCache<K, V, B = MemoryBackingStore<K, V>> {
    cache: KeyValueStore<K, V>,
    store: B,
    write_count: u64,
    read_count: u64,
    cache_hits: u64,
    store_hits: u64,
    misses: u64,
}

impl<K, V> Default for WriteThroughCache<K, V, MemoryBackingStore<K, V>>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(MemoryBackingStore::new())
    }
}

impl<K, V, B> WriteThroughCache<K, V, B>
where
    K: Eq + Hash + Clone,
    V: Clone,
    B: BackingStore<K, V>,
{
    // == Constructor ==
    pub fn new(store: B) -> Self {
        Self {
            cache: KeyValueStore::new(),
            store,
            write_count: 0,
            read_count: 0,
            cache_hits: 0,
            store_hits: 0,
            misses: 0,
        }
    }

    // == Write ==
    /// Writes to the cache, then to the backing store.
    ///
    /// If the store rejects the write, the cache is restored to its previous
    /// state for `key` and the store's error is returned, so the two tiers
    /// never disagree after a failed write.
    pub fn write(&mut self, key: K, value: V) -> Result<()> {
        self.write_count += 1;

        let previous = self.cache.set(key.clone(), value.clone());

        if let Err(err) = self.store.write(key.clone(), value) {
            match previous {
                Some(old) => {
                    self.cache.set(key, old);
                }
                None => {
                    self.cache.delete(&key);
                }
            }
            warn!(%err, "Backing store write failed, cache write rolled back");
            return Err(err);
        }

        Ok(())
    }

    // == Read ==
    /// Reads from the cache, falling back to the store. A store hit fills
    /// the cache before returning.
    pub fn read(&mut self, key: &K) -> Option<V> {
        self.read_count += 1;

        if let Some(value) = self.cache.get(key) {
            self.cache_hits += 1;
            return Some(value);
        }

        match self.store.read(key) {
            Some(value) => {
                self.store_hits += 1;
                self.cache.set(key.clone(), value.clone());
                debug!("Filled cache from backing store");
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key` from the store, then from the cache.
    pub fn delete(&mut self, key: &K) -> Result<bool> {
        let existed = self.cache.contains(key) || self.store.read(key).is_some();
        self.store.remove(key)?;
        self.cache.delete(key);
        Ok(existed)
    }

    /// Empties the fast tier only, as if the cache had been lost.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn is_cached(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    // == Stats ==
    pub fn stats(&self) -> WriteThroughStats {
        WriteThroughStats {
            writes: self.write_count,
            reads: self.read_count,
            cache_hits: self.cache_hits,
            store_hits: self.store_hits,
            misses: self.misses,
            cached_entries: self.cache.len(),
            stored_entries: self.store.len(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    /// Store that rejects writes for one poisoned key.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryBackingStore<String, String>,
        poisoned: Option<String>,
    }

    impl BackingStore<String, String> for FlakyStore {
        fn write(&mut self, key: String, value: String) -> Result<()> {
            if self.poisoned.as_deref() == Some(key.as_str()) {
                return Err(CacheError::BackingStore(format!("refused {key}")));
            }
            self.inner.write(key, value)
        }

        fn read(&self, key: &String) -> Option<String> {
            self.inner.read(key)
        }

        fn remove(&mut self, key: &String) -> Result<()> {
            self.inner.remove(key)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn test_write_reaches_both_tiers() {
        let mut cache: WriteThroughCache<String, String> = WriteThroughCache::default();

        cache.write("k".to_string(), "v".to_string()).unwrap();

        assert!(cache.is_cached(&"k".to_string()));
        assert_eq!(cache.store().read(&"k".to_string()), Some("v".to_string()));
    }

    #[test]
    fn test_read_after_cache_clear_refills() {
        let mut cache: WriteThroughCache<String, String> = WriteThroughCache::default();
        let key = "k".to_string();
        cache.write(key.clone(), "v".to_string()).unwrap();

        assert_eq!(cache.read(&key), Some("v".to_string()));

        cache.clear_cache();
        assert!(!cache.is_cached(&key));

        assert_eq!(cache.read(&key), Some("v".to_string()));
        assert!(cache.is_cached(&key));

        let stats = cache.stats();
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.store_hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_counters_count_every_call() {
        let mut cache: WriteThroughCache<String, String> = WriteThroughCache::default();

        cache.read(&"missing".to_string());
        cache.read(&"missing".to_string());
        cache.write("a".to_string(), "1".to_string()).unwrap();

        assert_eq!(cache.read_count(), 2);
        assert_eq!(cache.write_count(), 1);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_failed_store_write_rolls_back_new_key() {
        let store = FlakyStore {
            poisoned: Some("bad".to_string()),
            ..Default::default()
        };
        let mut cache = WriteThroughCache::new(store);

        let result = cache.write("bad".to_string(), "v".to_string());

        assert!(matches!(result, Err(CacheError::BackingStore(_))));
        assert!(!cache.is_cached(&"bad".to_string()));
        assert_eq!(cache.read(&"bad".to_string()), None);
        assert_eq!(cache.write_count(), 1);
    }

    #[test]
    fn test_failed_store_write_restores_previous_value() {
        let mut cache = WriteThroughCache::new(FlakyStore::default());
        let key = "k".to_string();
        cache.write(key.clone(), "old".to_string()).unwrap();

        cache.store.poisoned = Some(key.clone());
        assert!(cache.write(key.clone(), "new".to_string()).is_err());

        assert_eq!(cache.read(&key), Some("old".to_string()));
        assert_eq!(cache.store().read(&key), Some("old".to_string()));
    }

    #[test]
    fn test_delete_removes_from_both() {
        let mut cache: WriteThroughCache<String, String> = WriteThroughCache::default();
        let key = "k".to_string();
        cache.write(key.clone(), "v".to_string()).unwrap();

        assert!(cache.delete(&key).unwrap());
        assert!(!cache.delete(&key).unwrap());
        assert_eq!(cache.read(&key), None);
        assert!(cache.store().is_empty());
    }
}
