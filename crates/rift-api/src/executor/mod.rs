//! Rate-limited request execution
//!
//! The orchestrator hands every uncached call to a [`RateLimitedExecutor`],
//! which submits it exactly once to a [`Scheduler`]. The scheduler owns
//! queueing, quota accounting, the HTTP call itself and any retries.
//! [`RateLimiter`] is the scheduler shipped with the crate; anything else
//! implementing the trait can be swapped in.

mod gate;
mod limiter;
mod quota;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

pub use limiter::{RateLimitConfig, RateLimiter};
pub use quota::{DEFAULT_APP_LIMITS, Datastore, QuotaWindow};

/// Highest scheduling priority.
pub const PRIORITY_HIGHEST: u8 = 0;
/// Lowest scheduling priority; larger values are clamped to it.
pub const PRIORITY_LOWEST: u8 = 9;
/// Priority of jobs that do not ask for one.
pub const PRIORITY_DEFAULT: u8 = 5;

/// Request headers, by name.
pub type Headers = BTreeMap<String, String>;

/// Everything needed to perform one HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    /// Serialized JSON body
    pub body: Option<String>,
}

impl RequestDescriptor {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: Headers::new(),
            body: None,
        }
    }
}

/// Scheduling hints for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Used for tracing; not required to be unique
    pub id: String,
    /// 0 (highest) to 9 (lowest); `None` means the scheduler default
    pub priority: Option<u8>,
    /// Longest time the job may wait in the queue before it is abandoned
    pub expiration: Option<Duration>,
}

impl JobDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            priority: None,
            expiration: None,
        }
    }
}

/// Runs described jobs under some concurrency and quota budget.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Perform the request and return its parsed JSON body.
    async fn execute(&self, request: RequestDescriptor, job: JobDescriptor) -> Result<Value>;
}

/// Submits jobs to a scheduler and awaits their outcome.
///
/// One submission per call; errors come back exactly as the scheduler
/// produced them.
#[derive(Clone)]
pub struct RateLimitedExecutor {
    scheduler: Arc<dyn Scheduler>,
}

impl fmt::Debug for RateLimitedExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitedExecutor").finish_non_exhaustive()
    }
}

impl RateLimitedExecutor {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self { scheduler }
    }

    pub async fn execute(&self, request: RequestDescriptor, job: JobDescriptor) -> Result<Value> {
        debug!(
            job = %job.id,
            priority = ?job.priority,
            method = %request.method,
            url = %request.url,
            "submitting job"
        );
        self.scheduler.execute(request, job).await
    }
}
