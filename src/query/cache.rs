//! Storage for resolved query results.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::key::QueryKey;

/// A cached query result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub updated_at: Instant,
    /// `None` means the entry never goes stale on its own
    pub stale_at: Option<Instant>,
    /// Set by invalidation; forces the next read to refetch
    pub invalidated: bool,
}

impl CacheEntry {
    pub fn new(value: Value, stale_time: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            updated_at: now,
            stale_at: now.checked_add(stale_time),
            invalidated: false,
        }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        !self.invalidated && self.stale_at.map_or(true, |at| now < at)
    }
}

/// Capabilities the query client needs from a cache backend.
pub trait QueryCache: Send + Sync {
    fn get(&self, key: &QueryKey) -> Option<CacheEntry>;

    fn set(&self, key: QueryKey, value: Value, stale_time: Duration);

    /// Marks every entry under `prefix` stale. Returns how many were marked.
    fn invalidate(&self, prefix: &QueryKey) -> usize;

    fn clear(&self);
}

/// In-process cache backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl QueryCache for MemoryCache {
    fn get(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: QueryKey, value: Value, stale_time: Duration) {
        self.lock().insert(key, CacheEntry::new(value, stale_time));
    }

    fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.lock();
        let mut count = 0;
        for (_, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
            entry.invalidated = true;
            count += 1;
        }
        count
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
