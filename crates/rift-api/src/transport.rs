//! Shared HTTP transport
//!
//! All outbound calls (API requests and Data Dragon fetches) go through one
//! pooled `reqwest` client per process unless a caller asks for a custom
//! configuration.

use std::sync::{Arc, Once, OnceLock};
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;

static GLOBAL_HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();
static CRYPTO_PROVIDER: Once = Once::new();

const USER_AGENT: &str = concat!("rift-api/", env!("CARGO_PKG_VERSION"));

/// Install the ring provider for rustls once per process.
///
/// A provider installed earlier by the application wins.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// HTTP transport client with connection pooling
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Handle on the process-wide client, built with [`HttpConfig::default`]
    /// on first use.
    pub fn new() -> Result<Self> {
        if let Some(client) = GLOBAL_HTTP_CLIENT.get() {
            return Ok(Self {
                client: Arc::clone(client),
            });
        }

        let built = Arc::new(build_client(&HttpConfig::default())?);
        // Another thread may have won the race; use whichever got stored.
        let client = GLOBAL_HTTP_CLIENT.get_or_init(|| built);
        Ok(Self {
            client: Arc::clone(client),
        })
    }

    /// Dedicated client with custom configuration
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: Arc::new(build_client(config)?),
        })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

fn build_client(config: &HttpConfig) -> Result<Client> {
    ensure_crypto_provider();

    let mut builder = ClientBuilder::new()
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .tcp_nodelay(true)
        .http2_adaptive_window(true)
        .redirect(reqwest::redirect::Policy::limited(3))
        .user_agent(config.user_agent.as_deref().unwrap_or(USER_AGENT));

    if config.enable_compression {
        builder = builder.gzip(true).brotli(true).deflate(true);
    }

    Ok(builder.build()?)
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Whole-request timeout
    pub timeout: Duration,

    pub connect_timeout: Duration,

    /// Enable compression (gzip, brotli, deflate)
    pub enable_compression: bool,

    /// Overrides the default `rift-api/<version>` agent
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_idle_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            enable_compression: true,
            user_agent: None,
        }
    }
}
