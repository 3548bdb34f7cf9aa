//! Key-Value Store Module
//!
//! The plain mapping every policy builds on. No eviction of its own.

use std::collections::hash_map::Iter;
use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::Cache;

// == Key Value Store ==
/// Generic key → value map with no retention policy.
#[derive(Debug, Clone)]
pub struct KeyValueStore<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for KeyValueStore<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> KeyValueStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Inserts or overwrites `key`, returning the previous value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    // == Get ==
    /// Returns a copy of the stored value.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.entries.get(key).cloned()
    }

    /// Borrows the stored value. Crate-internal so wrappers can inspect
    /// metadata without cloning.
    pub(crate) fn get_ref(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    // == Delete ==
    /// Removes `key` if present; a no-op otherwise.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    // == Has ==
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Count ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Drops every entry for which `keep` returns false. Returns how many
    /// were removed.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, v| keep(k, v));
        before - self.entries.len()
    }
}

impl<K, V> Cache<K, V> for KeyValueStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn set(&mut self, key: K, value: V) {
        KeyValueStore::set(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        KeyValueStore::get(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        KeyValueStore::delete(self, key).is_some()
    }

    fn contains(&self, key: &K) -> bool {
        KeyValueStore::contains(self, key)
    }

    fn len(&self) -> usize {
        KeyValueStore::len(self)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store: KeyValueStore<String, i32> = KeyValueStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = KeyValueStore::new();

        store.set("key1".to_string(), "value1".to_string());

        assert_eq!(store.get(&"key1".to_string()), Some("value1".to_string()));
        assert!(store.contains(&"key1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store: KeyValueStore<&str, i32> = KeyValueStore::new();
        assert_eq!(store.get(&"nonexistent"), None);
        assert!(!store.contains(&"nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = KeyValueStore::new();

        assert_eq!(store.set("key1", 1), None);
        assert_eq!(store.set("key1", 2), Some(1));

        assert_eq!(store.get(&"key1"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let mut store = KeyValueStore::new();
        store.set("key1", 1);

        assert_eq!(store.delete(&"key1"), Some(1));
        assert_eq!(store.delete(&"key1"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_returns_copies() {
        let mut store = KeyValueStore::new();
        store.set("list", vec![1, 2, 3]);

        let mut copy = store.get(&"list").unwrap();
        copy.push(4);

        assert_eq!(store.get(&"list"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_store_retain() {
        let mut store = KeyValueStore::new();
        for i in 0..10 {
            store.set(i, i * 10);
        }

        let removed = store.retain(|k, _| k % 2 == 0);

        assert_eq!(removed, 5);
        assert_eq!(store.len(), 5);
        assert!(store.keys().all(|k| k % 2 == 0));
    }
}
