//! Request orchestration
//!
//! [`RiotApi`] ties the pieces together for every call:
//!
//! ```text
//! request(region, key, params, options)
//!   │
//!   ├─ UrlBuilder::resolve ──────────── registry / path / query errors
//!   ├─ ResponseCache::get (key has TTL) ─ hit ──► return
//!   ├─ RateLimitedExecutor::execute ─── scheduler errors, unchanged
//!   ├─ ResponseCache::set (key has TTL)
//!   └─ return
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{CacheBackend, ResponseCache};
use crate::config::ClientConfig;
use crate::ddragon::DDragon;
use crate::error::{ApiError, Result};
use crate::executor::{
    Datastore, Headers, JobDescriptor, RateLimitedExecutor, RateLimiter, RequestDescriptor,
    Scheduler,
};
use crate::region::Region;
use crate::registry::MethodRegistry;
use crate::transport::HttpClient;
use crate::url_builder::{PathParams, QueryParams, UrlBuilder};

/// Header carrying the API key.
pub const TOKEN_HEADER: &str = "X-Riot-Token";

/// Per-call options. Every field is optional; the defaults are:
///
/// | field | default |
/// |-------|---------|
/// | `id` | current Unix time in milliseconds |
/// | `priority` | scheduler default |
/// | `expiration` | wait indefinitely |
/// | `params` | no query string |
/// | `body` | none |
/// | `method` | `GET` |
/// | `headers` | `X-Riot-Token: <token>`; a supplied map replaces it |
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub id: Option<String>,
    pub priority: Option<u8>,
    pub expiration: Option<Duration>,
    pub params: Option<QueryParams>,
    pub body: Option<Value>,
    pub method: Option<Method>,
    pub headers: Option<Headers>,
}

/// Client for the Riot web API.
///
/// Construct once and share; every method takes `&self`.
///
/// ## Caching
///
/// Responses are cached only when the configuration carries a cache section
/// *and* the method key has a positive TTL in it. Cache keys are resolved
/// URLs, so different path or query parameters never collide. Two concurrent
/// first calls for the same URL may both reach the API; nothing here
/// serializes them.
///
/// ## Example
///
/// ```rust,no_run
/// use rift_api::registry::methods;
/// use rift_api::{ClientConfig, PathParams, Region, RequestOptions, RiotApi};
///
/// # async fn run() -> rift_api::Result<()> {
/// let api = RiotApi::new("RGAPI-00000000", ClientConfig::default())?;
/// let summoner: serde_json::Value = api
///     .request(
///         Region::Euw1,
///         methods::summoner::GET_BY_SUMMONER_NAME,
///         &PathParams::new().with("summonerName", "Demos"),
///         RequestOptions::default(),
///     )
///     .await?;
/// println!("{summoner}");
/// # Ok(())
/// # }
/// ```
pub struct RiotApi {
    token: String,
    config: ClientConfig,
    urls: UrlBuilder,
    cache: Option<Arc<dyn ResponseCache>>,
    executor: RateLimitedExecutor,
    ddragon: DDragon,
}

impl std::fmt::Debug for RiotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiotApi")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl RiotApi {
    /// Client using the built-in [`RateLimiter`].
    ///
    /// Unless the rate-limit configuration names a datastore, quota counters
    /// live wherever the cache does: in Redis for a networked cache, in
    /// process otherwise.
    pub fn new(token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let token = checked_token(token.into())?;
        let http = http_client(&config)?;

        let mut limits = config.rate_limit.clone();
        if limits.datastore.is_none() {
            limits.datastore = Some(match config.cache.as_ref().map(|c| &c.backend) {
                Some(CacheBackend::Networked { url, .. }) => {
                    Datastore::Shared { url: url.clone() }
                }
                _ => Datastore::Local,
            });
        }
        let scheduler = Arc::new(RateLimiter::with_http(&limits, http.clone())?);

        Self::assemble(token, config, scheduler, http)
    }

    /// Client submitting jobs to a caller-provided scheduler.
    pub fn with_scheduler(
        token: impl Into<String>,
        config: ClientConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self> {
        let token = checked_token(token.into())?;
        let http = http_client(&config)?;
        Self::assemble(token, config, scheduler, http)
    }

    fn assemble(
        token: String,
        config: ClientConfig,
        scheduler: Arc<dyn Scheduler>,
        http: HttpClient,
    ) -> Result<Self> {
        let cache = config
            .cache
            .as_ref()
            .map(|c| c.backend.build())
            .transpose()?;

        info!(
            host = %config.host_template,
            cached_methods = config.cache.as_ref().map_or(0, |c| c.ttls.len()),
            "riot api client ready"
        );

        Ok(Self {
            token,
            urls: UrlBuilder::new(config.host_template.clone()),
            ddragon: DDragon::with_http(config.ddragon_host.clone(), http),
            cache,
            executor: RateLimitedExecutor::new(scheduler),
            config,
        })
    }

    /// Replace the method catalog, e.g. with extra caller-registered methods.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<MethodRegistry>) -> Self {
        self.urls = self.urls.with_registry(registry);
        self
    }

    /// Call a method and decode its JSON response.
    ///
    /// Registry and path-parameter errors are returned before any I/O.
    /// Scheduler errors come back unchanged; nothing is retried here.
    pub async fn request<T: DeserializeOwned>(
        &self,
        region: Region,
        method_key: &str,
        path_params: &PathParams,
        options: RequestOptions,
    ) -> Result<T> {
        let url = self
            .urls
            .resolve(region, method_key, path_params, options.params.as_ref())?;

        let caching = self.caching_for(method_key);
        if let Some((cache, _)) = caching
            && let Some(hit) = cache.get(&url).await?
        {
            if self.config.debug {
                debug!(method = method_key, url = %url, "cache hit");
            }
            return Ok(serde_json::from_value(hit)?);
        }

        let RequestOptions {
            id,
            priority,
            expiration,
            body,
            method,
            headers,
            params: _,
        } = options;

        let request = RequestDescriptor {
            url: url.clone(),
            method: method.unwrap_or(Method::GET),
            headers: headers.unwrap_or_else(|| self.default_headers()),
            body: body.map(|b| serde_json::to_string(&b)).transpose()?,
        };
        let job = JobDescriptor {
            id: id.unwrap_or_else(timestamp_id),
            priority,
            expiration,
        };

        let value = self.executor.execute(request, job).await?;

        if let Some((cache, ttl)) = caching {
            cache.set(&url, &value, ttl).await?;
            if self.config.debug {
                debug!(method = method_key, url = %url, ttl_ms = ttl.as_millis(), "cache write");
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// The response cache, when one is configured.
    pub fn cache(&self) -> Option<&Arc<dyn ResponseCache>> {
        self.cache.as_ref()
    }

    /// Data Dragon static-asset client.
    pub fn ddragon(&self) -> &DDragon {
        &self.ddragon
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }

    fn default_headers(&self) -> Headers {
        Headers::from([(TOKEN_HEADER.to_string(), self.token.clone())])
    }

    fn caching_for(&self, method_key: &str) -> Option<(&Arc<dyn ResponseCache>, Duration)> {
        let ttl = self.config.cache.as_ref()?.ttl_for(method_key)?;
        Some((self.cache.as_ref()?, ttl))
    }
}

fn checked_token(token: String) -> Result<String> {
    if token.trim().is_empty() {
        Err(ApiError::MissingToken)
    } else {
        Ok(token)
    }
}

fn http_client(config: &ClientConfig) -> Result<HttpClient> {
    match &config.http {
        Some(http) => HttpClient::with_config(http),
        None => HttpClient::new(),
    }
}

fn timestamp_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_default()
}
