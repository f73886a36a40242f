//! Redis-backed response cache

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{CacheResult, CacheStats, ResponseCache, StatCounters};

const SCAN_BATCH: usize = 500;

/// Response cache stored in a Redis-compatible server.
///
/// Every key is prefixed with the cache's namespace and values are stored as
/// JSON text. The connection is opened on first use so construction stays
/// synchronous; the connection manager reconnects on its own afterwards.
pub struct RedisCache {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
    key_prefix: String,
    stats: StatCounters,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("key_prefix", &self.key_prefix)
            .field("connected", &self.connection.initialized())
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Validate `url` and prepare a lazily connected cache.
    pub fn new(url: &str, key_prefix: impl Into<String>) -> CacheResult<Self> {
        Ok(Self {
            client: redis::Client::open(url)?,
            connection: OnceCell::new(),
            key_prefix: key_prefix.into(),
            stats: StatCounters::default(),
        })
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                debug!("connecting response cache to redis");
                ConnectionManager::new(self.client.clone()).await
            })
            .await?;
        Ok(manager.clone())
    }
}

/// Seconds for `SETEX`, rounded up so sub-second TTLs never reach zero.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

/// Escape the `SCAN MATCH` metacharacters so the prefix matches literally.
fn glob_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl ResponseCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(self.namespaced(key)).await?;
        self.stats.record_lookup(raw.is_some());
        Ok(raw.map(|text| serde_json::from_str(&text)).transpose()?)
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> CacheResult<()> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.connection().await?;
        let key = self.namespaced(key);
        if ttl.is_zero() {
            let _: () = conn.set(key, payload).await?;
        } else {
            let _: () = conn.set_ex(key, payload, ttl_seconds(ttl)).await?;
        }
        self.stats.record_write();
        Ok(())
    }

    async fn flush(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", glob_escape(&self.key_prefix));
        let mut cursor: u64 = 0;
        let mut removed = 0usize;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            if !keys.is_empty() {
                removed += keys.len();
                let _: () = conn.del(keys).await?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!("flushed {removed} keys under '{}'", self.key_prefix);
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot(None)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_rounds_up_to_whole_seconds() {
        assert_eq!(ttl_seconds(Duration::from_millis(10)), 1);
        assert_eq!(ttl_seconds(Duration::from_millis(999)), 1);
        assert_eq!(ttl_seconds(Duration::from_millis(1000)), 1);
        assert_eq!(ttl_seconds(Duration::from_millis(1001)), 2);
        assert_eq!(ttl_seconds(Duration::from_secs(3600)), 3600);
    }

    #[test]
    fn test_scan_pattern_escapes_prefix() {
        assert_eq!(glob_escape("rift-api-"), "rift-api-");
        assert_eq!(glob_escape("app*[1]?"), r"app\*\[1\]\?");
        assert_eq!(glob_escape(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_keys_are_namespaced() {
        let cache = RedisCache::new("redis://127.0.0.1/", "rift-api-").expect("valid url");
        assert_eq!(
            cache.namespaced("https://euw1.api.riotgames.com/x"),
            "rift-api-https://euw1.api.riotgames.com/x"
        );
        assert_eq!(cache.key_prefix(), "rift-api-");
    }
}
