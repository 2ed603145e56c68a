//! TTL-bounded response store.

use super::key::CacheKey;
use crate::types::GenerationResult;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct CacheEntry {
    result: GenerationResult,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// Counters observed since construction.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
}

impl AtomicStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// In-memory store mapping canonical keys to previously obtained results.
///
/// Staleness is checked lazily on read; there is no background sweeper.
/// Entries are written only for successful results and are immutable until
/// expiry. Lookups are synchronous and never suspend.
pub struct ResponseCache {
    ttl: Duration,
    max_entries: usize,
    enabled: bool,
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: AtomicStats,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            enabled: true,
            entries: RwLock::new(HashMap::new()),
            stats: AtomicStats::new(),
        }
    }

    /// A cache that stores nothing and always misses.
    pub fn disabled() -> Self {
        let mut cache = Self::new(Duration::ZERO, 0);
        cache.enabled = false;
        cache
    }

    /// Fetch a live entry; an expired entry is removed on the way out.
    pub fn get(&self, key: &CacheKey) -> Option<GenerationResult> {
        if !self.enabled {
            return None;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match entries.get(key.as_str()) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.result.clone())
            }
            Some(_) => {
                entries.remove(key.as_str());
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = key.as_str(), "cache entry expired");
                None
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a successful result under the current time.
    pub fn put(&self, key: &CacheKey, result: GenerationResult) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        self.evict_if_needed(&mut entries);
        entries.insert(
            key.as_str().to_string(),
            CacheEntry {
                result,
                stored_at: Instant::now(),
            },
        );
        self.stats.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.values().filter(|e| !e.is_expired(self.ttl)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    fn evict_if_needed(&self, entries: &mut HashMap<String, CacheEntry>) {
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(self.ttl));
        let mut evicted = (before - entries.len()) as u64;
        while entries.len() >= self.max_entries.max(1) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    entries.remove(&k);
                    evicted += 1;
                }
                None => break,
            }
        }
        if evicted > 0 {
            self.stats.evictions.fetch_add(evicted, Ordering::Relaxed);
        }
    }
}
