//! In-process response cache

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use super::{CacheResult, CacheStats, DEFAULT_MAX_ENTRIES, ResponseCache, StatCounters};

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
    /// Insertion sequence number; lower is older
    seq: u64,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Writer-side bookkeeping, guarded by one lock so the size bound holds
/// under concurrent writers.
#[derive(Debug, Default)]
struct WriteState {
    next_seq: u64,
    /// `(key, seq)` per insertion, oldest first. Records whose entry was
    /// overwritten or removed are skipped on eviction.
    order: VecDeque<(String, u64)>,
    /// Earliest expiry that may still be in the map
    soonest_expiry: Option<Instant>,
}

/// Concurrent map with lazy expiry.
///
/// Expired entries are removed when read; there is no background sweep.
/// Once `max_entries` is reached, inserting a new key first purges expired
/// entries (only when one is due) and then evicts the oldest insertion.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    writes: Mutex<WriteState>,
    max_entries: usize,
    stats: StatCounters,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// A bound of zero is treated as one.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            writes: Mutex::new(WriteState::default()),
            max_entries: max_entries.max(1),
            stats: StatCounters::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.writes.lock();
        self.purge_locked(&mut state, Instant::now())
    }

    fn purge_locked(&self, state: &mut WriteState, now: Instant) -> usize {
        let before = self.entries.len();
        let mut soonest: Option<Instant> = None;
        self.entries.retain(|_, entry| {
            if entry.is_expired(now) {
                return false;
            }
            if let Some(at) = entry.expires_at {
                soonest = Some(soonest.map_or(at, |s| s.min(at)));
            }
            true
        });
        state.soonest_expiry = soonest;
        before.saturating_sub(self.entries.len())
    }

    fn make_room(&self, state: &mut WriteState, now: Instant) {
        while self.entries.len() >= self.max_entries {
            if state.soonest_expiry.is_some_and(|at| at <= now)
                && self.purge_locked(state, now) > 0
            {
                continue;
            }
            let Some((key, seq)) = state.order.pop_front() else {
                break;
            };
            if self.entries.remove_if(&key, |_, entry| entry.seq == seq).is_some() {
                trace!("evicting oldest cache entry {key}");
            }
        }
    }

    /// Drop order records that no longer point at a live entry.
    fn compact(&self, state: &mut WriteState) {
        let entries = &self.entries;
        state
            .order
            .retain(|(key, seq)| entries.get(key).is_some_and(|entry| entry.seq == *seq));
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(entry) => {
                // Release the shard read lock before removing
                drop(entry);
                self.entries.remove_if(key, |_, entry| entry.is_expired(now));
                None
            }
            None => None,
        };
        self.stats.record_lookup(value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let expires_at = (!ttl.is_zero()).then(|| now + ttl);

        let mut state = self.writes.lock();
        if !self.entries.contains_key(key) {
            self.make_room(&mut state, now);
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.order.push_back((key.to_string(), seq));
        if let Some(at) = expires_at {
            state.soonest_expiry = Some(state.soonest_expiry.map_or(at, |s| s.min(at)));
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                expires_at,
                seq,
            },
        );
        if state.order.len() > self.max_entries.saturating_mul(2) {
            self.compact(&mut state);
        }
        drop(state);

        self.stats.record_write();
        Ok(())
    }

    async fn flush(&self) -> CacheResult<()> {
        let mut state = self.writes.lock();
        self.entries.clear();
        state.order.clear();
        state.soonest_expiry = None;
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot(Some(self.entries.len() as u64))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_returns_value_before_expiry() {
        let cache = MemoryCache::new();
        cache
            .set("k", &json!({"name": "Demos"}), Duration::from_secs(60))
            .await
            .expect("set");
        assert_eq!(
            cache.get("k").await.expect("get"),
            Some(json!({"name": "Demos"}))
        );
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted_on_read() {
        let cache = MemoryCache::new();
        cache
            .set("k", &json!(1), Duration::from_millis(20))
            .await
            .expect("set");
        assert_eq!(cache.get("k").await.expect("get"), Some(json!(1)));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("k").await.expect("get"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_zero_ttl_never_expires() {
        let cache = MemoryCache::new();
        cache.set("k", &json!("v"), Duration::ZERO).await.expect("set");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(cache.get("k").await.expect("get"), Some(json!("v")));
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("missing").await.expect("get"), None);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_flush_clears_everything() {
        let cache = MemoryCache::new();
        cache.set("a", &json!(1), Duration::ZERO).await.expect("set");
        cache
            .set("b", &json!(2), Duration::from_secs(5))
            .await
            .expect("set");
        cache.flush().await.expect("flush");
        assert!(cache.is_empty());
        assert_eq!(cache.get("a").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_bound_evicts_oldest() {
        let cache = MemoryCache::with_max_entries(2);
        cache.set("a", &json!(1), Duration::ZERO).await.expect("set");
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.set("b", &json!(2), Duration::ZERO).await.expect("set");
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.set("c", &json!(3), Duration::ZERO).await.expect("set");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").await.expect("get"), None);
        assert_eq!(cache.get("c").await.expect("get"), Some(json!(3)));
    }

    #[tokio::test]
    async fn test_bound_prefers_purging_expired() {
        let cache = MemoryCache::with_max_entries(2);
        cache.set("old", &json!(1), Duration::ZERO).await.expect("set");
        cache
            .set("short", &json!(2), Duration::from_millis(5))
            .await
            .expect("set");
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.set("new", &json!(3), Duration::ZERO).await.expect("set");

        assert_eq!(cache.get("old").await.expect("get"), Some(json!(1)));
        assert_eq!(cache.get("new").await.expect("get"), Some(json!(3)));
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = MemoryCache::with_max_entries(2);
        cache.set("a", &json!(1), Duration::ZERO).await.expect("set");
        cache.set("b", &json!(2), Duration::ZERO).await.expect("set");
        cache.set("a", &json!(10), Duration::ZERO).await.expect("set");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b").await.expect("get"), Some(json!(2)));
        assert_eq!(cache.get("a").await.expect("get"), Some(json!(10)));
    }

    #[tokio::test]
    async fn test_stats_track_hits_and_writes() {
        let cache = MemoryCache::new();
        cache.set("k", &json!(1), Duration::ZERO).await.expect("set");
        let _ = cache.get("k").await.expect("get");
        let _ = cache.get("k").await.expect("get");
        let _ = cache.get("nope").await.expect("get");

        let stats = cache.stats();
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, Some(1));
    }

    #[tokio::test]
    async fn test_overwritten_key_is_evicted_by_latest_insertion() {
        let cache = MemoryCache::with_max_entries(2);
        for i in 0..50 {
            cache.set("a", &json!(i), Duration::ZERO).await.expect("set");
        }
        cache.set("b", &json!("b"), Duration::ZERO).await.expect("set");
        cache.set("c", &json!("c"), Duration::ZERO).await.expect("set");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").await.expect("get"), None);
        assert_eq!(cache.get("b").await.expect("get"), Some(json!("b")));
        assert_eq!(cache.get("c").await.expect("get"), Some(json!("c")));
        assert!(cache.writes.lock().order.len() <= 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_bound_holds_under_concurrent_writers() {
        let cache = std::sync::Arc::new(MemoryCache::with_max_entries(8));
        let mut handles = Vec::new();
        for task in 0..8 {
            let cache = std::sync::Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    cache
                        .set(&format!("{task}-{i}"), &json!(i), Duration::ZERO)
                        .await
                        .expect("set");
                }
            }));
        }
        for handle in handles {
            handle.await.expect("writer");
        }
        assert_eq!(cache.len(), 8);
    }
}
