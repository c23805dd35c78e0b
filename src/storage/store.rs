//! In-Memory Key-Value Store
//!
//! Thread-safe hashmap with TTL metadata and lazy expiration.
//!
//! Every read takes the shared lock; every mutation takes the exclusive
//! lock. An expired entry is only removed when a lookup of that exact key
//! discovers it, or when the caller asks for [`Store::purge_expired`].

use hashbrown::HashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::config::StoreConfig;
use super::entry::Entry;
use super::stats::{Counters, StoreStats};
use crate::error::{Result, StoreError};

struct Inner<V> {
    map: RwLock<HashMap<String, Entry<V>>>,
    counters: Counters,
}

/// Thread-safe in-memory key-value store with per-entry TTL
///
/// Cloning a `Store` yields another handle to the same map.
pub struct Store<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for Store<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<V> Store<V> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store from explicit construction parameters
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                map: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
                counters: Counters::default(),
            }),
        }
    }

    /// Insert or overwrite `key`.
    ///
    /// A zero `ttl` stores the value permanently; otherwise it expires
    /// `ttl` from now. Value and deadline are replaced together.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = Entry::new(value, ttl, Instant::now());
        self.insert(key.into(), entry);
    }

    /// Insert or overwrite `key` with no expiration
    pub fn put_permanent(&self, key: impl Into<String>, value: V) {
        self.insert(key.into(), Entry::permanent(value));
    }

    fn insert(&self, key: String, entry: Entry<V>) {
        // The replaced entry is dropped after the guard is released
        let _old = self.inner.map.write().insert(key, entry);
    }

    /// Delete `key`, returns true if a live entry was removed.
    ///
    /// Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.inner.map.write().remove(key);
        removed.is_some_and(|entry| !entry.is_expired_at(Instant::now()))
    }

    /// Delete `key` and return its value, failing if it is absent or expired
    pub fn remove(&self, key: &str) -> Result<V> {
        let removed = self.inner.map.write().remove(key);
        match removed {
            Some(entry) if !entry.is_expired_at(Instant::now()) => Ok(entry.value),
            Some(_) => {
                self.inner.counters.expired(1);
                trace!(key = %key, "Removed expired key");
                Err(StoreError::NotFound(key.to_string()))
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    /// Check if key exists and is not expired
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.inner
            .map
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Remaining lifetime of `key`.
    ///
    /// `None` if absent or expired, `Some(None)` if it never expires.
    pub fn ttl(&self, key: &str) -> Option<Option<Duration>> {
        let now = Instant::now();
        let map = self.inner.map.read();
        let entry = map.get(key)?;
        if entry.is_expired_at(now) {
            return None;
        }
        Some(entry.remaining(now))
    }

    /// Get the number of stored entries (including expired ones not yet removed)
    pub fn len(&self) -> usize {
        self.inner.map.read().len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all live keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let map = self.inner.map.read();
        map.iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Remove expired keys, returns count of removed keys
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let removed = {
            let mut map = self.inner.map.write();
            let before = map.len();
            map.retain(|_, entry| !entry.is_expired_at(now));
            before - map.len()
        };

        if removed > 0 {
            self.inner.counters.expired(removed as u64);
            debug!(removed = removed, "Purged expired keys");
        }
        removed
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.map.write().clear();
    }

    /// Snapshot of lookup counters
    pub fn stats(&self) -> StoreStats {
        self.inner.counters.snapshot()
    }
}

impl<V: Clone> Store<V> {
    /// Get value by key, returns None if key doesn't exist or is expired.
    ///
    /// The common path runs under the shared lock. When the entry turns
    /// out to be expired, the exclusive lock is taken and the entry is
    /// checked again before removal, so a value refreshed by a concurrent
    /// `put` in between is returned rather than deleted.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let map = self.inner.map.read();
            match map.get(key) {
                None => {
                    self.inner.counters.miss();
                    return None;
                }
                Some(entry) if !entry.is_expired_at(Instant::now()) => {
                    self.inner.counters.hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        self.remove_if_expired(key)
    }

    /// Exclusive-lock half of `get`
    fn remove_if_expired(&self, key: &str) -> Option<V> {
        let mut map = self.inner.map.write();
        let now = Instant::now();

        let expired = match map.get(key) {
            None => {
                self.inner.counters.miss();
                return None;
            }
            Some(entry) if !entry.is_expired_at(now) => {
                self.inner.counters.hit();
                return Some(entry.value.clone());
            }
            Some(_) => map.remove(key),
        };
        drop(map);
        drop(expired);

        self.inner.counters.expired(1);
        self.inner.counters.miss();
        trace!(key = %key, "Removed expired key");
        None
    }
}
