//! Response Cache Module
//!
//! Key/value cache for upstream HTTP responses. Keys are a cache name plus
//! an optional lookup parameter (for example `weather:tehran`). There is no
//! invalidation path other than the per-entry TTL; readers may observe
//! stale data for up to that duration.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::CacheEntry;

// == Response Cache ==
/// TTL-bounded cache of JSON payloads.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Get ==
    /// Returns the cached payload if present and not expired.
    ///
    /// Expired entries are removed on read, so a miss here always means the
    /// caller should recompute and `put`.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    // == Put ==
    /// Stores a payload under `key` for `ttl_seconds`. Overwrites and
    /// restarts the TTL if the key already exists.
    pub fn put(&mut self, key: String, value: Value, ttl_seconds: u64) {
        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
