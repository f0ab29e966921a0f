//! Time-boxed cache for the rendered home feed.
//!
//! The home feed is the one hot, identical-for-everyone page, so its
//! rendered body is kept in process memory under a per-page key and served
//! as-is until the entry expires. The cache is deliberately stale within
//! its window: a post created two seconds after an entry was stored will
//! not appear until the entry expires or someone calls [`PageCache::clear`].
//! No write path invalidates it. No other feed is cached.

use actix_web::web::Bytes;
use dashmap::DashMap;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use std::time::{Duration, Instant};
use tracing::debug;

lazy_static! {
    static ref CACHE_HIT: IntCounter = register_int_counter!(
        "gazette_page_cache_hit_total",
        "Total number of home feed cache hits"
    )
    .expect("Failed to register gazette_page_cache_hit_total");
    static ref CACHE_MISS: IntCounter = register_int_counter!(
        "gazette_page_cache_miss_total",
        "Total number of home feed cache misses"
    )
    .expect("Failed to register gazette_page_cache_miss_total");
}

#[derive(Debug, Clone)]
struct CachedEntry {
    data: Bytes,
    expires_at: Instant,
}

impl CachedEntry {
    #[inline]
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn new(data: Bytes, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }
}

/// In-process cache of rendered page bodies with TTL expiry.
pub struct PageCache {
    store: DashMap<String, CachedEntry>,
    ttl: Duration,
}

impl PageCache {
    /// A zero TTL disables the cache entirely: `put` becomes a no-op and
    /// `get` always misses.
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a cached body if present and not expired. Expired entries are
    /// dropped on access; there is no background sweeper.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.store.remove_if(key, |_, entry| entry.is_expired());

        match self.store.get(key) {
            Some(entry) => {
                CACHE_HIT.inc();
                Some(entry.data.clone())
            }
            None => {
                CACHE_MISS.inc();
                None
            }
        }
    }

    pub fn put(&self, key: String, data: Bytes) {
        if self.ttl.is_zero() {
            return;
        }
        debug!(key = %key, bytes = data.len(), "caching rendered page");
        self.store.insert(key, CachedEntry::new(data, self.ttl));
    }

    /// Drop every entry. Administrative reset path; also what the test
    /// suite uses to observe "fresh after clear" behavior.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_entry_within_ttl() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.put("home:page=1".to_string(), Bytes::from_static(b"body"));
        assert_eq!(
            cache.get("home:page=1"),
            Some(Bytes::from_static(b"body"))
        );
    }

    #[test]
    fn expired_entry_misses_and_is_dropped() {
        let cache = PageCache::new(Duration::from_millis(10));
        cache.put("home:page=1".to_string(), Bytes::from_static(b"body"));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("home:page=1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_the_store() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.put("home:page=1".to_string(), Bytes::from_static(b"a"));
        cache.put("home:page=2".to_string(), Bytes::from_static(b"b"));
        cache.clear();
        assert_eq!(cache.get("home:page=1"), None);
        assert_eq!(cache.get("home:page=2"), None);
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = PageCache::new(Duration::ZERO);
        cache.put("home:page=1".to_string(), Bytes::from_static(b"body"));
        assert_eq!(cache.get("home:page=1"), None);
        assert!(cache.is_empty());
    }
}
