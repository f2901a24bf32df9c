//! The cache map and its freshness rules.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::clock::{Clock, SystemClock};
use super::key::site_prefix;
use crate::content::{BatchContent, ContentResponse};

/// Time-to-live for every cache entry (5 minutes).
pub const CACHE_TTL_MS: i64 = 5 * 60 * 1000;

/// Payload stored under a cache key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// The API answered 404 for this section.
    Empty,
    /// A single section.
    Found(ContentResponse),
    /// Merged result for one exact batch id set.
    BatchFound(BatchContent),
}

impl CachedValue {
    /// Interpret as a single-section lookup result.
    ///
    /// Returns `None` for batch payloads, which never live under a content key.
    pub fn into_section(self) -> Option<Option<ContentResponse>> {
        match self {
            CachedValue::Empty => Some(None),
            CachedValue::Found(content) => Some(Some(content)),
            CachedValue::BatchFound(_) => None,
        }
    }
}

impl From<Option<ContentResponse>> for CachedValue {
    fn from(content: Option<ContentResponse>) -> Self {
        match content {
            Some(content) => CachedValue::Found(content),
            None => CachedValue::Empty,
        }
    }
}

/// Cached payload with its creation time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub timestamp_ms: i64,
}

impl CacheEntry {
    fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp_ms <= CACHE_TTL_MS
    }
}

/// In-memory content cache.
///
/// Uses a HashMap behind a tokio RwLock. The lock is only held for the map
/// operation itself, never across a network call.
#[derive(Debug)]
pub struct ContentCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache {
    /// Create an empty cache on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { entries: RwLock::new(HashMap::new()), clock }
    }

    /// Look up a fresh entry.
    ///
    /// A stale entry is removed on the way out and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<CachedValue> {
        let now = self.clock.now_ms();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_fresh(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        // Another task may have refreshed the key between the two locks.
        if let Some(entry) = entries.get(key) {
            if entry.is_fresh(now) {
                return Some(entry.value.clone());
            }
            entries.remove(key);
            tracing::debug!(key, "evicted expired cache entry");
        }
        None
    }

    /// Insert or overwrite `key`, stamped with the current time.
    pub async fn put(&self, key: String, value: CachedValue) {
        let entry = CacheEntry { value, timestamp_ms: self.clock.now_ms() };
        self.entries.write().await.insert(key, entry);
    }

    /// Remove a single key. Returns whether it was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Remove every key belonging to `site_id`, batch entries included.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate_site(&self, site_id: &str) -> usize {
        let prefix = site_prefix(site_id);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&prefix));
        before - entries.len()
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Whether `key` is stored, regardless of freshness. Does not evict.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}
