//! Request quotas per routing key
//!
//! Riot enforces "application" limits per routing host, for example 20
//! requests per second and 100 per two minutes. Each configured window must
//! have room before a request goes out.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::{ApiError, Result};

/// `requests` per `per`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaWindow {
    pub requests: u32,
    pub per: Duration,
}

impl QuotaWindow {
    pub const fn new(requests: u32, per: Duration) -> Self {
        Self { requests, per }
    }
}

/// Default development-key application limits.
pub const DEFAULT_APP_LIMITS: [QuotaWindow; 2] = [
    QuotaWindow::new(20, Duration::from_secs(1)),
    QuotaWindow::new(100, Duration::from_secs(120)),
];

/// Where quota counters live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Datastore {
    /// Counters in this process only.
    #[default]
    Local,
    /// Counters in a Redis-compatible server, shared by every client
    /// pointed at it.
    Shared { url: String },
}

const SHARED_KEY_PREFIX: &str = "rift-api-quota:";
const MIN_SHARED_WAIT: Duration = Duration::from_millis(10);

pub(crate) enum QuotaStore {
    Local(Vec<DefaultKeyedRateLimiter<String>>),
    Shared {
        client: redis::Client,
        connection: OnceCell<ConnectionManager>,
        windows: Vec<QuotaWindow>,
    },
}

impl std::fmt::Debug for QuotaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(limiters) => f.debug_tuple("Local").field(&limiters.len()).finish(),
            Self::Shared { windows, .. } => {
                f.debug_struct("Shared").field("windows", windows).finish()
            }
        }
    }
}

impl QuotaStore {
    pub(crate) fn new(datastore: &Datastore, windows: &[QuotaWindow]) -> Result<Self> {
        let windows: Vec<QuotaWindow> = windows
            .iter()
            .copied()
            .filter(|w| w.requests > 0 && !w.per.is_zero())
            .collect();

        match datastore {
            Datastore::Local => Ok(Self::Local(
                windows
                    .iter()
                    .filter_map(|w| local_quota(*w))
                    .map(DefaultKeyedRateLimiter::keyed)
                    .collect(),
            )),
            Datastore::Shared { url } => Ok(Self::Shared {
                client: redis::Client::open(url.as_str())
                    .map_err(|e| ApiError::Datastore(e.to_string()))?,
                connection: OnceCell::new(),
                windows,
            }),
        }
    }

    /// Wait until every window has room for one more request under `key`.
    pub(crate) async fn until_ready(&self, key: &str) -> Result<()> {
        match self {
            Self::Local(limiters) => {
                let key = key.to_string();
                for limiter in limiters {
                    limiter.until_key_ready(&key).await;
                }
                Ok(())
            }
            Self::Shared {
                client,
                connection,
                windows,
            } => {
                let mut conn = connection
                    .get_or_try_init(|| ConnectionManager::new(client.clone()))
                    .await
                    .map_err(|e| ApiError::Datastore(e.to_string()))?
                    .clone();
                for window in windows {
                    take_shared(&mut conn, key, *window)
                        .await
                        .map_err(|e| ApiError::Datastore(e.to_string()))?;
                }
                Ok(())
            }
        }
    }
}

/// Token bucket refilling one cell every `per / requests`, bursting to
/// `requests`.
fn local_quota(window: QuotaWindow) -> Option<Quota> {
    let burst = NonZeroU32::new(window.requests)?;
    Quota::with_period(window.per / window.requests).map(|q| q.allow_burst(burst))
}

/// Fixed-window counter: `INCR`, arm the expiry on the first hit, and sleep
/// out the window while it is full.
async fn take_shared(
    conn: &mut ConnectionManager,
    key: &str,
    window: QuotaWindow,
) -> redis::RedisResult<()> {
    let window_ms = i64::try_from(window.per.as_millis()).unwrap_or(i64::MAX);
    let counter = format!("{SHARED_KEY_PREFIX}{key}:{window_ms}");
    loop {
        let count: u64 = conn.incr(&counter, 1).await?;
        if count == 1 {
            let _: () = conn.pexpire(&counter, window_ms).await?;
        }
        if count <= u64::from(window.requests) {
            return Ok(());
        }

        // -1: counter has no expiry, -2: counter already gone
        let remaining: i64 = conn.pttl(&counter).await?;
        if remaining == -1 {
            let _: () = conn.pexpire(&counter, window_ms).await?;
        }
        let wait = u64::try_from(remaining)
            .map_or(MIN_SHARED_WAIT, Duration::from_millis)
            .max(MIN_SHARED_WAIT);
        trace!("quota window {counter} full, waiting {wait:?}");
        tokio::time::sleep(wait).await;
    }
}
