//! Configuration structures for the API client

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::cache::{CacheBackend, DEFAULT_KEY_PREFIX, DEFAULT_MAX_ENTRIES};
use crate::ddragon::DEFAULT_DDRAGON_HOST;
use crate::error::{ApiError, Result};
use crate::executor::RateLimitConfig;
use crate::transport::HttpConfig;
use crate::url_builder::DEFAULT_HOST_TEMPLATE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Log cache hits and writes at debug level
    pub debug: bool,

    /// API host pattern; `{region}` is replaced by the routing id
    pub host_template: String,

    /// Data Dragon host
    pub ddragon_host: String,

    /// Response caching; `None` disables the cache entirely
    pub cache: Option<CacheConfig>,

    /// Default scheduler settings
    pub rate_limit: RateLimitConfig,

    /// HTTP transport settings; `None` uses the shared process-wide client
    pub http: Option<HttpConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debug: false,
            host_template: DEFAULT_HOST_TEMPLATE.to_string(),
            ddragon_host: DEFAULT_DDRAGON_HOST.to_string(),
            cache: None,
            rate_limit: RateLimitConfig::default(),
            http: None,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            debug: env_flag("RIFT_DEBUG"),
            host_template: std::env::var("RIFT_HOST_TEMPLATE")
                .unwrap_or(defaults.host_template),
            cache: CacheConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env(),
            ..defaults
        })
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// TTL in milliseconds per method key. Keys that are absent or zero
    /// are never cached.
    pub ttls: BTreeMap<String, u64>,
}

impl CacheConfig {
    pub fn new(backend: CacheBackend) -> Self {
        Self {
            backend,
            ttls: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, method_key: impl Into<String>, ttl: Duration) -> Self {
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self.ttls.insert(method_key.into(), millis);
        self
    }

    /// Positive TTL configured for a method key.
    pub fn ttl_for(&self, method_key: &str) -> Option<Duration> {
        self.ttls
            .get(method_key)
            .copied()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Cache configuration from `RIFT_CACHE`, `RIFT_CACHE_URL` and
    /// `RIFT_CACHE_MAX_ENTRIES`. Unset `RIFT_CACHE` means no cache.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(kind) = std::env::var("RIFT_CACHE") else {
            return Ok(None);
        };

        let backend = match kind.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => return Ok(None),
            "local" => CacheBackend::Local {
                max_entries: std::env::var("RIFT_CACHE_MAX_ENTRIES")
                    .ok()
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(DEFAULT_MAX_ENTRIES),
            },
            "networked" | "redis" => CacheBackend::Networked {
                url: std::env::var("RIFT_CACHE_URL").map_err(|_| {
                    ApiError::Config("RIFT_CACHE=networked requires RIFT_CACHE_URL".to_string())
                })?,
                key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            },
            other => {
                return Err(ApiError::Config(format!(
                    "unknown cache backend '{other}' (expected local or networked)"
                )));
            }
        };

        Ok(Some(Self::new(backend)))
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
}
