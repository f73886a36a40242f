//! Default scheduler: priority queue, quota windows, HTTP dispatch, retries

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info};
use url::Url;

use super::gate::PriorityGate;
use super::quota::{DEFAULT_APP_LIMITS, Datastore, QuotaStore, QuotaWindow};
use super::{JobDescriptor, PRIORITY_DEFAULT, RequestDescriptor, Scheduler};
use crate::error::{ApiError, Result};
use crate::retry::RetryPolicy;
use crate::transport::HttpClient;

/// Default ceiling on jobs running at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Configuration for the default scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum jobs executing at once
    pub concurrency: usize,

    /// Quota windows applied per routing host
    pub windows: Vec<QuotaWindow>,

    /// Where quota counters live; `None` lets the client pick one to match
    /// its cache backend
    pub datastore: Option<Datastore>,

    pub retry: RetryPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            windows: DEFAULT_APP_LIMITS.to_vec(),
            datastore: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl RateLimitConfig {
    /// Reads `RIFT_CONCURRENCY`, `RIFT_DATASTORE_URL` and the retry
    /// variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            concurrency: std::env::var("RIFT_CONCURRENCY")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.concurrency),
            datastore: std::env::var("RIFT_DATASTORE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .map(|url| Datastore::Shared { url }),
            retry: RetryPolicy::from_env(),
            ..defaults
        }
    }
}

/// The scheduler used unless the caller injects another.
///
/// A job first waits for a concurrency slot (highest priority first), then
/// for room in every quota window of its routing host, then performs the HTTP
/// call. A job's expiration covers both waits. Retryable failures repeat the
/// quota wait and the call under the same slot.
#[derive(Debug)]
pub struct RateLimiter {
    gate: PriorityGate,
    quota: QuotaStore,
    retry: RetryPolicy,
    http: HttpClient,
}

impl RateLimiter {
    /// Scheduler over the shared HTTP client.
    pub fn new(config: &RateLimitConfig) -> Result<Self> {
        Self::with_http(config, HttpClient::new()?)
    }

    pub fn with_http(config: &RateLimitConfig, http: HttpClient) -> Result<Self> {
        let datastore = config.datastore.clone().unwrap_or_default();
        info!(
            concurrency = config.concurrency,
            windows = config.windows.len(),
            shared = matches!(datastore, Datastore::Shared { .. }),
            "rate limiter ready"
        );
        Ok(Self {
            gate: PriorityGate::new(config.concurrency),
            quota: QuotaStore::new(&datastore, &config.windows)?,
            retry: config.retry.clone(),
            http,
        })
    }

    async fn send(&self, request: &RequestDescriptor) -> Result<Value> {
        let mut builder = self
            .http
            .inner()
            .request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            let has_content_type = request
                .headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited {
                retry_after: retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::HttpStatus { status, body });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Scheduler for RateLimiter {
    async fn execute(&self, request: RequestDescriptor, job: JobDescriptor) -> Result<Value> {
        let deadline = job.expiration.map(|expiration| Instant::now() + expiration);
        let key = routing_key(&request.url)?;
        let priority = job.priority.unwrap_or(PRIORITY_DEFAULT);

        let _permit = self
            .gate
            .acquire(priority, deadline)
            .await
            .map_err(|_| ApiError::Expired { id: job.id.clone() })?;

        // Still queued until the first quota wait is over.
        match deadline {
            Some(deadline) => timeout_at(deadline, self.quota.until_ready(&key))
                .await
                .map_err(|_| ApiError::Expired { id: job.id.clone() })??,
            None => self.quota.until_ready(&key).await?,
        }

        debug!(job = %job.id, key = %key, "job admitted");
        let key = key.as_str();
        let request = &request;
        let mut first_attempt = true;
        self.retry
            .execute(|| {
                let retrying = !std::mem::replace(&mut first_attempt, false);
                async move {
                    if retrying {
                        self.quota.until_ready(key).await?;
                    }
                    self.send(request).await
                }
            })
            .await
    }
}

/// Quota partition for a URL: its host, plus the port when one is given.
fn routing_key(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ApiError::InvalidArgument(format!("URL '{url}' has no host")))?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// `Retry-After` in delta-seconds form.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
#[allow(clippy::expect_used, unsafe_code)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_routing_key() {
        assert_eq!(
            routing_key("https://euw1.api.riotgames.com/lol/x?y=1").expect("key"),
            "euw1.api.riotgames.com"
        );
        assert_eq!(
            routing_key("http://127.0.0.1:8080/lol/x").expect("key"),
            "127.0.0.1:8080"
        );
        assert!(routing_key("not a url").is_err());
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(3)));
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.windows, DEFAULT_APP_LIMITS.to_vec());
        assert_eq!(config.datastore, None);
    }

    #[test]
    fn test_config_from_env() {
        unsafe {
            std::env::set_var("RIFT_CONCURRENCY", "4");
            std::env::set_var("RIFT_DATASTORE_URL", "redis://quota.local/");
        }
        let config = RateLimitConfig::from_env();
        assert_eq!(config.concurrency, 4);
        assert_eq!(
            config.datastore,
            Some(Datastore::Shared {
                url: "redis://quota.local/".to_string()
            })
        );
        unsafe {
            std::env::remove_var("RIFT_CONCURRENCY");
            std::env::remove_var("RIFT_DATASTORE_URL");
        }
    }
}
