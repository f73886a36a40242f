//! Retry policy implementation with exponential backoff

use rand::RngExt;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum retry attempts after the first try
    pub max_attempts: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Backoff multiplier
    pub multiplier: f64,

    /// Add up to 30% random jitter to each delay
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Create retry policy from `RIFT_*` environment variables
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: env_parse("RIFT_MAX_RETRIES").unwrap_or(defaults.max_attempts),
            initial_backoff: env_parse("RIFT_RETRY_BACKOFF")
                .map_or(defaults.initial_backoff, Duration::from_millis),
            max_backoff: env_parse("RIFT_MAX_BACKOFF")
                .map_or(defaults.max_backoff, Duration::from_secs),
            multiplier: env_parse("RIFT_BACKOFF_MULTIPLIER")
                .filter(|m: &f64| m.is_finite() && *m >= 1.0)
                .unwrap_or(defaults.multiplier),
            jitter: env_parse("RIFT_RETRY_JITTER").unwrap_or(defaults.jitter),
        }
    }

    /// Execute a function with retry logic
    ///
    /// Only errors for which [`ApiError::should_retry`](crate::ApiError::should_retry)
    /// holds are retried. A `Retry-After` hint on the error is a lower bound
    /// for the next delay.
    pub async fn execute<F, Fut, T>(&self, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if !e.should_retry() || attempt >= self.max_attempts => {
                    return Err(e);
                }
                Err(e) => {
                    attempt += 1;

                    let mut delay = backoff;
                    if self.jitter {
                        let jitter = rng().random_range(0.0..0.3);
                        #[allow(clippy::cast_precision_loss)]
                        let jitter_ms = (delay.as_millis() as f64 * jitter) as u64;
                        delay += Duration::from_millis(jitter_ms);
                    }
                    if let Some(hint) = e.retry_after_hint() {
                        delay = delay.max(hint);
                    }

                    tracing::warn!(
                        "Attempt {} failed: {}; retrying in {:?}",
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;

                    backoff = self.next_backoff(backoff);
                }
            }
        }
    }

    /// Grow `backoff` by the multiplier, capped at `max_backoff`. A
    /// multiplier below 1 or not finite leaves the delay unchanged.
    fn next_backoff(&self, backoff: Duration) -> Duration {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return backoff.min(self.max_backoff);
        }
        Duration::try_from_secs_f64(backoff.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
#[allow(
    unsafe_code,
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    const ENV_VARS: [&str; 5] = [
        "RIFT_MAX_RETRIES",
        "RIFT_RETRY_BACKOFF",
        "RIFT_MAX_BACKOFF",
        "RIFT_BACKOFF_MULTIPLIER",
        "RIFT_RETRY_JITTER",
    ];

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_secs(1),
            multiplier: 2.0,
            jitter: false,
        }
    }

    fn rate_limited() -> ApiError {
        ApiError::RateLimited { retry_after: None }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(500));
        assert_eq!(policy.max_backoff, Duration::from_secs(30));
        assert!((policy.multiplier - 2.0).abs() < f64::EPSILON);
        assert!(policy.jitter);
        assert_eq!(RetryPolicy::none().max_attempts, 0);
    }

    // Defaults and overrides share one test so they never race on the
    // process environment.
    #[test]
    fn test_from_env() {
        for var in ENV_VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
        assert_eq!(RetryPolicy::from_env(), RetryPolicy::default());

        unsafe {
            std::env::set_var("RIFT_MAX_RETRIES", "5");
            std::env::set_var("RIFT_RETRY_BACKOFF", "200");
            std::env::set_var("RIFT_MAX_BACKOFF", "20");
            std::env::set_var("RIFT_BACKOFF_MULTIPLIER", "1.5");
            std::env::set_var("RIFT_RETRY_JITTER", "false");
        }
        let policy = RetryPolicy::from_env();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_backoff, Duration::from_millis(200));
        assert_eq!(policy.max_backoff, Duration::from_secs(20));
        assert!((policy.multiplier - 1.5).abs() < f64::EPSILON);
        assert!(!policy.jitter);

        unsafe {
            std::env::set_var("RIFT_MAX_RETRIES", "lots");
            std::env::set_var("RIFT_BACKOFF_MULTIPLIER", "-1");
        }
        let policy = RetryPolicy::from_env();
        assert_eq!(policy.max_attempts, 3);
        assert!((policy.multiplier - 2.0).abs() < f64::EPSILON);

        for var in ENV_VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[tokio::test]
    async fn test_execute_success_on_first_try() {
        let call_count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&call_count);

        let result = fast_policy(3)
            .execute(|| async {
                *counter.lock().unwrap() += 1;
                Ok::<i32, ApiError>(42)
            })
            .await;

        assert_eq!(result.expect("first try succeeds"), 42);
        assert_eq!(*call_count.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_execute_retries_rate_limited() {
        let call_count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&call_count);

        let start = Instant::now();
        let result = fast_policy(3)
            .execute(|| async {
                let mut count = counter.lock().unwrap();
                *count += 1;
                if *count < 3 {
                    Err(rate_limited())
                } else {
                    Ok::<i32, ApiError>(42)
                }
            })
            .await;

        assert_eq!(result.expect("third try succeeds"), 42);
        assert_eq!(*call_count.lock().unwrap(), 3);
        assert!(start.elapsed() >= Duration::from_millis(2));
    }

    #[tokio::test]
    async fn test_execute_fail_on_non_retryable_error() {
        let call_count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&call_count);

        let result = fast_policy(3)
            .execute(|| async {
                *counter.lock().unwrap() += 1;
                Err::<i32, ApiError>(ApiError::InvalidArgument("bad".to_string()))
            })
            .await;

        assert!(matches!(
            result.expect_err("not retried"),
            ApiError::InvalidArgument(_)
        ));
        assert_eq!(*call_count.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_execute_exceed_max_attempts() {
        let call_count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&call_count);

        let result = fast_policy(2)
            .execute(|| async {
                *counter.lock().unwrap() += 1;
                Err::<i32, ApiError>(rate_limited())
            })
            .await;

        assert!(matches!(
            result.expect_err("exhausted"),
            ApiError::RateLimited { .. }
        ));
        // initial + max_attempts
        assert_eq!(*call_count.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_retry_after_hint_is_honoured() {
        let call_count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&call_count);

        let start = Instant::now();
        let result = fast_policy(1)
            .execute(|| async {
                let mut count = counter.lock().unwrap();
                *count += 1;
                if *count == 1 {
                    Err(ApiError::RateLimited {
                        retry_after: Some(Duration::from_millis(60)),
                    })
                } else {
                    Ok::<i32, ApiError>(7)
                }
            })
            .await;

        assert_eq!(result.expect("second try succeeds"), 7);
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_backoff_progression() {
        let policy = RetryPolicy {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(50),
            multiplier: 2.0,
            jitter: false,
        };
        let call_count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&call_count);
        let start = Instant::now();

        let _result = policy
            .execute(|| async {
                *counter.lock().unwrap() += 1;
                Err::<i32, ApiError>(rate_limited())
            })
            .await;

        // 10 + 20 + 40 + 50 (capped)
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(120));
        assert!(elapsed < Duration::from_millis(400));
        assert_eq!(*call_count.lock().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_negative_multiplier_returns_error() {
        let policy = RetryPolicy {
            multiplier: -1.0,
            ..fast_policy(2)
        };
        let call_count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&call_count);

        let result = policy
            .execute(|| async {
                *counter.lock().unwrap() += 1;
                Err::<i32, ApiError>(rate_limited())
            })
            .await;

        assert!(matches!(
            result.expect_err("exhausted"),
            ApiError::RateLimited { .. }
        ));
        assert_eq!(*call_count.lock().unwrap(), 3);
    }

    #[test]
    fn test_next_backoff_bounds() {
        let policy = fast_policy(1);
        assert_eq!(
            policy.next_backoff(Duration::from_millis(400)),
            Duration::from_millis(800)
        );
        assert_eq!(
            policy.next_backoff(Duration::from_millis(800)),
            Duration::from_secs(1)
        );

        let nan = RetryPolicy {
            multiplier: f64::NAN,
            ..fast_policy(1)
        };
        assert_eq!(
            nan.next_backoff(Duration::from_millis(5)),
            Duration::from_millis(5)
        );
        let huge = RetryPolicy {
            multiplier: f64::MAX,
            ..fast_policy(1)
        };
        assert_eq!(
            huge.next_backoff(Duration::from_millis(5)),
            Duration::from_secs(1)
        );
    }
}
