//! Retry with exponential backoff for idempotent backend reads.

use std::future::Future;
use std::time::Duration;

use crate::error::{HelpdeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, for operations that must not be repeated.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt + 1` (attempts are 1-based).
    ///
    /// `None` when the server asks to wait longer than `max_delay`; the
    /// rate limit is then surfaced instead of retried early.
    pub fn delay_for(&self, attempt: u32, error: &HelpdeskError) -> Option<Duration> {
        if let HelpdeskError::RateLimited(secs) = error {
            let wait = Duration::from_secs(*secs);
            return (wait <= self.max_delay).then_some(wait);
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        Some(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out.
pub async fn execute_with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let Some(delay) = policy.delay_for(attempt, &e) else {
                    tracing::warn!(attempt, error = %e, "retry-after exceeds backoff cap, giving up");
                    return Err(e);
                };
                tracing::warn!(attempt, ?delay, error = %e, "transient backend error, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = execute_with_retry(fast(), || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(HelpdeskError::Api {
                    status: 502,
                    message: "bad gateway".to_string(),
                })
            } else {
                Ok(n)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = execute_with_retry(fast(), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(HelpdeskError::Api {
                status: 400,
                message: "bad request".to_string(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = execute_with_retry(fast(), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(HelpdeskError::RateLimited(0))
        })
        .await;
        assert!(matches!(result, Err(HelpdeskError::RateLimited(0))));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_long_retry_after_is_not_shortened() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = execute_with_retry(fast(), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(HelpdeskError::RateLimited(60))
        })
        .await;
        assert!(matches!(result, Err(HelpdeskError::RateLimited(60))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        let err = HelpdeskError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(policy.delay_for(1, &err), Some(Duration::from_millis(200)));
        assert_eq!(policy.delay_for(2, &err), Some(Duration::from_millis(400)));
        assert_eq!(policy.delay_for(10, &err), Some(Duration::from_secs(5)));
        assert_eq!(
            policy.delay_for(1, &HelpdeskError::RateLimited(2)),
            Some(Duration::from_secs(2))
        );
        assert_eq!(policy.delay_for(1, &HelpdeskError::RateLimited(60)), None);
    }
}
