//! Response cache adapters
//!
//! The orchestrator consults a [`ResponseCache`] before dispatching a request
//! and writes successful responses back after it. Keys are resolved request
//! URLs; values are the decoded JSON payloads.
//!
//! Two backends are provided:
//!
//! - [`MemoryCache`]: in-process map with lazy expiry and an entry bound
//! - [`RedisCache`]: networked store shared between processes
//!
//! A TTL of zero means "no expiry" for both backends. Entries then live until
//! [`ResponseCache::flush`] (or, for the in-process store, until evicted by
//! the entry bound).

mod memory;
mod networked;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use memory::MemoryCache;
pub use networked::RedisCache;

/// Default bound on in-process cache entries.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default namespace for keys in a networked store.
pub const DEFAULT_KEY_PREFIX: &str = "rift-api-";

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Key-value store queried before dispatch and populated after success.
#[async_trait]
pub trait ResponseCache: Send + Sync + std::fmt::Debug {
    /// Cached value, or `None` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Store a value. A zero `ttl` stores without expiry.
    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> CacheResult<()>;

    /// Remove every entry in this cache's namespace.
    async fn flush(&self) -> CacheResult<()>;

    fn stats(&self) -> CacheStats;
}

/// Which store backs the response cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process map.
    Local { max_entries: usize },
    /// Redis-compatible server shared between processes.
    Networked { url: String, key_prefix: String },
}

impl Default for CacheBackend {
    fn default() -> Self {
        Self::Local {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheBackend {
    pub fn networked(url: impl Into<String>) -> Self {
        Self::Networked {
            url: url.into(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Construct the adapter. Networked stores connect on first use.
    pub fn build(&self) -> CacheResult<Arc<dyn ResponseCache>> {
        Ok(match self {
            Self::Local { max_entries } => Arc::new(MemoryCache::with_max_entries(*max_entries)),
            Self::Networked { url, key_prefix } => {
                Arc::new(RedisCache::new(url, key_prefix.clone())?)
            }
        })
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    /// Live entries, when the backend can count them cheaply.
    pub entries: Option<u64>,
}

impl CacheStats {
    /// Calculate cache hit rate as percentage
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            (self.hits as f64) / ((self.hits + self.misses) as f64) * 100.0
        }
    }
}

/// Shared hit/miss/write counters.
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

impl StatCounters {
    pub(crate) fn record_lookup(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entries: Option<u64>) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            entries,
        }
    }
}

/// Error type for cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            writes: 1,
            entries: None,
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert!(CacheStats::default().hit_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_backend_serde() {
        let backend: CacheBackend =
            serde_json::from_value(json!({"type": "local", "max_entries": 5})).expect("local");
        assert_eq!(backend, CacheBackend::Local { max_entries: 5 });

        let backend: CacheBackend = serde_json::from_value(json!({
            "type": "networked",
            "url": "redis://127.0.0.1/",
            "key_prefix": "x-"
        }))
        .expect("networked");
        assert_eq!(
            backend,
            CacheBackend::Networked {
                url: "redis://127.0.0.1/".to_string(),
                key_prefix: "x-".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_build_local_backend() {
        let cache = CacheBackend::default().build().expect("build");
        cache
            .set("k", &json!(1), Duration::ZERO)
            .await
            .expect("set");
        assert_eq!(cache.get("k").await.expect("get"), Some(json!(1)));
    }

    #[test]
    fn test_build_networked_backend_is_lazy() {
        // Nothing listens here; construction must not connect.
        let cache = CacheBackend::networked("redis://127.0.0.1:1/").build();
        assert!(cache.is_ok());
    }

    #[test]
    fn test_build_rejects_malformed_url() {
        assert!(CacheBackend::networked("not a url").build().is_err());
    }
}
