//! # TTL Cache
//!
//! Small in-memory cache for upstream snapshots (settings payloads,
//! exchange rates). Entries expire after a fixed TTL but stay readable as
//! stale values so callers can ride out upstream outages.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Keyed cache with a fixed time-to-live
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache. A zero TTL means every entry is already stale.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Value for `key` if stored within the TTL
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.is_fresh(self.ttl))
            .map(|e| e.value.clone())
    }

    /// Value for `key` regardless of age
    pub async fn get_stale(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries.get(key).map(|e| e.value.clone())
    }

    /// Store a value, resetting its age
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for `key`
    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
