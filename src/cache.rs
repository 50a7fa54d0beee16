//! Operation cache (computed table) for memoizing diagram operations.
//!
//! The cache is backed by a [HashMap], so it never returns a stale result for a
//! colliding key. Results stay valid for the whole life of the manager because
//! nodes are never freed.

use std::collections::HashMap;
use std::hash::Hash;

pub struct Cache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new(14)
    }
}

impl<K, V> Cache<K, V> {
    /// Creates a new cache with room for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");
        Self {
            map: HashMap::with_capacity(1 << bits),
            hits: 0,
            misses: 0,
        }
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    /// Get the cached result.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.map.get(key) {
            Some(&v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a result into the cache.
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}
