//! Retry with exponential backoff and jitter.
//!
//! Wraps any fallible async operation. Between attempts the caller sleeps
//! `base_delay * 2^attempt` plus a uniform jitter in `[0, 1s)` so that
//! concurrent clients hitting a rate limited API do not retry in lockstep.
//!
//! ```rust,ignore
//! let policy = RetryPolicy::default();
//! let track = with_retry(&policy, || catalog.get_track(id)).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::metrics::RETRIES_TOTAL;

/// Upper bound of the random jitter added to every backoff delay.
pub const MAX_JITTER: Duration = Duration::from_secs(1);

/// How many times to call an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of calls, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each following one.
    pub base_delay: Duration,
    /// Add `uniform(0, 1s)` to every delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            jitter: true,
        }
    }

    /// Same policy with jitter disabled (deterministic delays).
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// `base_delay * 2^attempt`, without jitter. `attempt` starts at 0.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self.backoff_delay(attempt);
        if self.jitter {
            delay + random_jitter()
        } else {
            delay
        }
    }
}

fn random_jitter() -> Duration {
    let secs: f64 = rand::thread_rng().gen_range(0.0..MAX_JITTER.as_secs_f64());
    Duration::from_secs_f64(secs)
}

/// Call `operation` until it succeeds or `policy.max_attempts` calls failed.
///
/// Returns the last error once attempts are exhausted.
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    with_retry_using(policy, tokio::time::sleep, operation).await
}

/// [`with_retry`] with a caller supplied sleep function.
pub async fn with_retry_using<F, Fut, T, E, S, SFut>(
    policy: &RetryPolicy,
    mut sleep: S,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(attempts = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt + 1 < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    error = %e,
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Operation failed, retrying"
                );
                RETRIES_TOTAL.inc();
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    attempts = attempt + 1,
                    "Operation failed after all retry attempts exhausted"
                );
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::ready;

    #[derive(Debug, PartialEq)]
    struct TestError(u32);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "failure #{}", self.0)
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(100)).without_jitter()
    }

    #[tokio::test]
    async fn test_success_first_try_never_sleeps() {
        let mut sleeps = Vec::new();
        let mut calls = 0;

        let result = with_retry_using(
            &policy(3),
            |d| {
                sleeps.push(d);
                ready(())
            },
            || {
                calls += 1;
                ready(Ok::<_, TestError>(42))
            },
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls, 1);
        assert!(sleeps.is_empty());
    }

    #[tokio::test]
    async fn test_fails_then_succeeds_sleeps_once_per_failure() {
        let mut sleeps = Vec::new();
        let mut calls = 0;

        let result = with_retry_using(
            &policy(3),
            |d| {
                sleeps.push(d);
                ready(())
            },
            || {
                calls += 1;
                let n = calls;
                ready(if n <= 2 { Err(TestError(n)) } else { Ok("done") })
            },
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls, 3);
        assert_eq!(
            sleeps,
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[tokio::test]
    async fn test_always_failing_returns_last_error_after_max_attempts() {
        let mut sleeps = Vec::new();
        let mut calls = 0;

        let result = with_retry_using(
            &policy(4),
            |d| {
                sleeps.push(d);
                ready(())
            },
            || {
                calls += 1;
                ready(Err::<(), _>(TestError(calls)))
            },
        )
        .await;

        assert_eq!(result, Err(TestError(4)));
        assert_eq!(calls, 4);
        assert_eq!(sleeps.len(), 3);
        assert!(sleeps.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_single_attempt_does_not_retry() {
        let mut calls = 0;
        let result = with_retry_using(
            &policy(1),
            |_| ready(()),
            || {
                calls += 1;
                ready(Err::<(), _>(TestError(calls)))
            },
        )
        .await;
        assert_eq!(result, Err(TestError(1)));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_jittered_delays_stay_in_range() {
        let policy = RetryPolicy::new(4, Duration::from_millis(500));
        let mut sleeps = Vec::new();

        let _ = with_retry_using(
            &policy,
            |d| {
                sleeps.push(d);
                ready(())
            },
            || ready(Err::<(), _>(TestError(0))),
        )
        .await;

        assert_eq!(sleeps.len(), 3);
        for (attempt, delay) in sleeps.iter().enumerate() {
            let base = policy.backoff_delay(attempt as u32);
            assert!(*delay >= base, "delay {:?} below base {:?}", delay, base);
            assert!(*delay < base + MAX_JITTER);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_uses_tokio_sleep() {
        let start = tokio::time::Instant::now();
        let mut calls = 0;

        let result = with_retry(
            &RetryPolicy::new(3, Duration::from_secs(1)).without_jitter(),
            || {
                calls += 1;
                let n = calls;
                ready(if n < 3 { Err(TestError(n)) } else { Ok(n) })
            },
        )
        .await;

        assert_eq!(result, Ok(3));
        // 1s + 2s of virtual time
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_delay_saturates() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        assert!(policy.backoff_delay(200) >= Duration::from_secs(1 << 20));
    }
}
