//! Shared interface implemented by every retention policy.

/// Common key/value operations.
///
/// `get` takes `&mut self` because most policies update bookkeeping
/// (recency, counters, lazy expiry) on read. Values are returned by clone so
/// callers never alias the cache's internal storage.
pub trait Cache<K, V> {
    /// Inserts or overwrites `key`.
    fn set(&mut self, key: K, value: V);

    /// Returns the live value for `key`, or `None` on a miss.
    fn get(&mut self, key: &K) -> Option<V>;

    /// Removes `key`. Returns whether anything was removed.
    fn delete(&mut self, key: &K) -> bool;

    /// Whether `key` currently holds a live value. Does not count as an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
