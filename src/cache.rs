//! Typed TTL cache keyed by string
//!
//! Values are stored type-erased and checked on read, so asking for a key
//! with the wrong type is a miss rather than a bad cast. Expired entries are
//! evicted lazily when read.

use parking_lot::RwLock;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    /// `None` never expires
    expires_at: Option<Instant>,
    type_name: &'static str,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Thread-safe cache shared through an `Arc`; the lock is internal
#[derive(Default)]
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous entry. `None` never expires.
    pub fn set<T: Send + Sync + 'static>(&self, key: &str, value: T, ttl: Option<Duration>) {
        self.set_shared(key, Arc::new(value), ttl);
    }

    pub fn set_shared<T: Send + Sync + 'static>(&self, key: &str, value: Arc<T>, ttl: Option<Duration>) {
        let entry = CacheEntry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
            type_name: type_name::<T>(),
        };
        trace!(key, ttl = ?ttl, "cache set");
        self.entries.write().insert(key.to_string(), entry);
    }

    /// The live value for `key`. Expired entries are removed; a type other
    /// than the stored one reads as absent.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            let entry = entries.get(key)?;
            if entry.is_live(now) {
                return match Arc::clone(&entry.value).downcast::<T>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        debug!(
                            key,
                            stored = entry.type_name,
                            requested = type_name::<T>(),
                            "cache type mismatch"
                        );
                        None
                    }
                };
            }
        }

        let mut entries = self.entries.write();
        // another reader may have replaced the entry in between
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
            debug!(key, "evicted expired cache entry");
        }
        None
    }

    /// Whether a live entry exists. Does not evict.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, expired ones included until they are read
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
