// Short-TTL response cache
//
// Keyed by the fully qualified request URL (query string included).
// Entries expire lazily: an expired entry is evicted on the next read
// of that exact key, there is no background sweeper. Auth-state and
// scope changes clear the whole map unconditionally.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tracing::trace;

pub(crate) const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct CacheEntry {
    data: Value,
    stored_at: Instant,
}

/// TTL map for GET response bodies.
///
/// Concurrent readers may race on the same key and both miss -- there
/// is deliberately no single-flight deduplication at this scale.
pub(crate) struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fetch a fresh entry, evicting it if past TTL.
    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                trace!(key, "cache hit");
                return Some(entry.data.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            trace!(key, "cache entry expired");
            self.entries.remove(key);
        }
        None
    }

    pub(crate) fn insert(&self, key: String, data: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                data,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry. Used on logout, auth failure, scope change,
    /// and after known-invalidating mutations.
    pub(crate) fn clear(&self) {
        if !self.entries.is_empty() {
            trace!("cache cleared");
        }
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
