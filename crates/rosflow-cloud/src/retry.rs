//! Deadline-bounded retry with incremental backoff
//!
//! The wait between attempts grows by a fixed step (`initial`, `initial + step`,
//! `initial + 2 * step`, ...) and the whole loop gives up once the next wait
//! would cross the deadline.

use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Retry policy for provider operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Overall wall-clock deadline for all attempts
    pub timeout: Duration,

    /// Wait before the second attempt
    pub initial_delay: Duration,

    /// Added to the wait after every further attempt
    pub step: Duration,
}

impl RetryPolicy {
    pub const fn new(timeout: Duration, initial_delay: Duration, step: Duration) -> Self {
        Self {
            timeout,
            initial_delay,
            step,
        }
    }

    /// Single-resource reads (5 minutes, 3s + 3s)
    pub const fn describe() -> Self {
        Self::new(
            Duration::from_secs(5 * 60),
            Duration::from_secs(3),
            Duration::from_secs(3),
        )
    }

    /// Cheap reads (3 minutes, 1s + 1s)
    pub const fn light() -> Self {
        Self::new(
            Duration::from_secs(3 * 60),
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
    }

    /// Paginated listings, per page (5 minutes, 3s + 5s)
    pub const fn list() -> Self {
        Self::new(
            Duration::from_secs(5 * 60),
            Duration::from_secs(3),
            Duration::from_secs(5),
        )
    }

    /// Mutating calls (10 minutes, 2s + 1s)
    pub const fn mutate() -> Self {
        Self::new(
            Duration::from_secs(10 * 60),
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
    }

    pub fn wait(&self) -> IncrementalWait {
        IncrementalWait::new(self.initial_delay, self.step)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::describe()
    }
}

/// Sequence of waits growing by a fixed step
#[derive(Debug, Clone)]
pub struct IncrementalWait {
    initial: Duration,
    step: Duration,
    attempt: u32,
}

impl IncrementalWait {
    pub fn new(initial: Duration, step: Duration) -> Self {
        Self {
            initial,
            step,
            attempt: 0,
        }
    }

    /// Delay for the given zero-based retry
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.initial.saturating_add(self.step.saturating_mul(attempt))
    }
}

impl Iterator for IncrementalWait {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.delay_for_attempt(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }
}

/// Why a retried operation gave up
#[derive(Debug)]
pub enum RetryError<E> {
    /// The operation failed with an error the classifier rejected
    Permanent(E),

    /// The deadline ran out while the operation kept failing transiently
    Exhausted { last: E, attempts: u32 },
}

impl<E> RetryError<E> {
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Permanent(e) => e,
            RetryError::Exhausted { last, .. } => last,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error or the
/// policy deadline expires.
pub async fn retry_with<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    is_retryable: R,
    mut op: F,
) -> std::result::Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let started = Instant::now();
    let mut waits = policy.wait();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retryable(&err) {
            return Err(RetryError::Permanent(err));
        }

        let delay = waits.next().unwrap_or(policy.initial_delay);
        if started.elapsed() + delay > policy.timeout {
            tracing::warn!(
                attempts,
                timeout = ?policy.timeout,
                "Giving up after transient failures: {}",
                err
            );
            return Err(RetryError::Exhausted {
                last: err,
                attempts,
            });
        }

        tracing::debug!(attempt = attempts, ?delay, "Retrying after transient failure: {}", err);
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_incremental_delays() {
        let waits: Vec<_> = IncrementalWait::new(Duration::from_secs(3), Duration::from_secs(5))
            .take(4)
            .collect();
        assert_eq!(
            waits,
            vec![
                Duration::from_secs(3),
                Duration::from_secs(8),
                Duration::from_secs(13),
                Duration::from_secs(18),
            ]
        );
    }

    #[test]
    fn test_profiles() {
        let light = RetryPolicy::light();
        assert_eq!(light.timeout, Duration::from_secs(180));
        assert_eq!(
            light.wait().take(3).collect::<Vec<_>>(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3),
            ]
        );
        assert_eq!(RetryPolicy::list().step, Duration::from_secs(5));
        assert_eq!(RetryPolicy::mutate().timeout, Duration::from_secs(600));
        assert_eq!(RetryPolicy::default(), RetryPolicy::describe());
    }

    #[tokio::test(start_paused = true)]
    async fn test_light_profile_gives_up_sooner() {
        let calls = Cell::new(0);
        let result: std::result::Result<(), RetryError<String>> =
            retry_with(&RetryPolicy::light(), |_| true, || {
                calls.set(calls.get() + 1);
                async { Err("Throttling".to_string()) }
            })
            .await;

        // waits of 1s, 2s, ..., 18s add up to 171s; a 19th wait would end at 190s
        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(calls.get(), 19);
        assert_eq!(err.into_inner(), "Throttling");
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let result: std::result::Result<&str, RetryError<String>> =
            retry_with(&RetryPolicy::describe(), |_| true, || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n <= 3 {
                        Err(format!("Throttling #{}", n))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = Cell::new(0);
        let result: std::result::Result<(), RetryError<String>> =
            retry_with(&RetryPolicy::describe(), |e: &String| e.starts_with("Throttling"), || {
                calls.set(calls.get() + 1);
                async { Err("Forbidden".to_string()) }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Permanent(ref e)) if e == "Forbidden"));
        assert_eq!(calls.get(), 1);
        let err = result.unwrap_err();
        assert!(!err.is_exhausted());
        assert_eq!(err.into_inner(), "Forbidden");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exhaustion_returns_last_error() {
        let policy = RetryPolicy::new(
            Duration::from_secs(10),
            Duration::from_secs(3),
            Duration::from_secs(3),
        );
        let calls = Cell::new(0);
        let started = Instant::now();
        let result: std::result::Result<(), RetryError<String>> =
            retry_with(&policy, |_| true, || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Err(format!("Throttling #{}", n)) }
            })
            .await;

        // waits of 3s and 6s fit into 10s, a third wait of 9s does not
        match result {
            Err(RetryError::Exhausted { last, attempts }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last, "Throttling #3");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(started.elapsed() <= policy.timeout);
    }
}
