//! Memoization Cache Module
//!
//! Caches function results keyed by a function identifier and its argument
//! tuple. A computation runs at most once per distinct key.

use serde::Serialize;
use tracing::debug;

use crate::cache::stats::ratio;
use crate::cache::KeyValueStore;
use crate::error::{CacheError, Result};

// == Memo Stats ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
    /// hits / (hits + misses), 0.0 before the first lookup
    pub hit_rate: f64,
    /// Number of results currently cached
    pub cached_results: usize,
}

// == Memoization Cache ==
/// Result cache for pure (or at-most-once) computations.
///
/// ```
/// use cache_lab::cache::MemoizationCache;
///
/// let mut memo = MemoizationCache::new();
/// let mut calls = 0;
/// let a = memo.memoize("square", &[12], |args| { calls += 1; args[0] * args[0] })?;
/// let b = memo.memoize("square", &[12], |args| { calls += 1; args[0] * args[0] })?;
/// assert_eq!((a, b, calls), (144, 144, 1));
/// # Ok::<(), cache_lab::CacheError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoizationCache<R> {
    results: KeyValueStore<String, R>,
    hits: u64,
    misses: u64,
}

impl<R> Default for MemoizationCache<R> {
    fn default() -> Self {
        Self {
            results: KeyValueStore::default(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<R: Clone> MemoizationCache<R> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Key ==
    /// Builds the lookup key: the function id followed by the JSON encoding
    /// of the argument tuple. Argument order is significant and separators
    /// inside string arguments cannot collide with the tuple boundaries.
    ///
    /// Arguments JSON cannot represent (maps with non-string keys, for
    /// instance) are rejected with `InvalidRequest`.
    pub fn cache_key<A: Serialize>(function_id: &str, args: &[A]) -> Result<String> {
        let encoded = serde_json::to_string(args).map_err(|err| {
            CacheError::InvalidRequest(format!(
                "Arguments for '{function_id}' cannot be encoded as a memo key: {err}"
            ))
        })?;
        Ok(format!("{function_id}:{encoded}"))
    }

    // == Memoize ==
    /// Returns the cached result for `(function_id, args)`, invoking
    /// `compute` only on the first call for that key. Fails without
    /// computing when the arguments have no key encoding.
    pub fn memoize<A, F>(&mut self, function_id: &str, args: &[A], compute: F) -> Result<R>
    where
        A: Serialize,
        F: FnOnce(&[A]) -> R,
    {
        let key = Self::cache_key(function_id, args)?;

        if let Some(result) = self.results.get(&key) {
            self.hits += 1;
            return Ok(result);
        }

        self.misses += 1;
        debug!(function_id, "Memoization miss, computing result");
        let result = compute(args);
        self.results.set(key, result.clone());
        Ok(result)
    }

    // == Try Memoize ==
    /// Like [`memoize`](Self::memoize) for fallible computations. Only `Ok`
    /// results are cached; an error is handed back and the next call retries.
    pub fn try_memoize<A, E, F>(
        &mut self,
        function_id: &str,
        args: &[A],
        compute: F,
    ) -> std::result::Result<R, E>
    where
        A: Serialize,
        E: From<CacheError>,
        F: FnOnce(&[A]) -> std::result::Result<R, E>,
    {
        let key = Self::cache_key(function_id, args)?;

        if let Some(result) = self.results.get(&key) {
            self.hits += 1;
            return Ok(result);
        }

        self.misses += 1;
        let result = compute(args)?;
        self.results.set(key, result.clone());
        Ok(result)
    }

    // == Lookup ==
    /// Whether a result for `(function_id, args)` is cached. Not counted.
    pub fn is_cached<A: Serialize>(&self, function_id: &str, args: &[A]) -> bool {
        Self::cache_key(function_id, args).is_ok_and(|key| self.results.contains(&key))
    }

    // == Invalidate ==
    /// Forgets one cached result so the next call recomputes it.
    pub fn invalidate<A: Serialize>(&mut self, function_id: &str, args: &[A]) -> bool {
        match Self::cache_key(function_id, args) {
            Ok(key) => self.results.delete(&key).is_some(),
            Err(_) => false,
        }
    }

    /// Drops every cached result. Counters are kept.
    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    // == Stats ==
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate: ratio(self.hits, self.hits + self.misses),
            cached_results: self.results.len(),
        }
    }
}
