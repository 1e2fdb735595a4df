//! Bounded fixed-interval retry
//!
//! The workload is a fast-starting local process, so the interval is fixed
//! rather than exponential. Timing out is an expected outcome, not an
//! exceptional one, so the result is a tagged value instead of an error.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a bounded retry loop.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// The attempt succeeded within the budget
    Ready(T),
    /// The budget elapsed without a successful attempt
    TimedOut {
        /// Wall time spent before giving up
        waited: Duration,
        /// Error from the last attempt, if any attempt ran
        last_error: Option<E>,
    },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn is_ready(&self) -> bool {
        matches!(self, RetryOutcome::Ready(_))
    }
}

/// Run `attempt` every `interval` until it succeeds or `budget` elapses.
///
/// The first attempt runs immediately. After a failed attempt the loop
/// sleeps for `interval` unless the budget is already spent, so wall-time
/// overrun is bounded by one interval plus the duration of the last attempt.
pub async fn until_ready<T, E, F, Fut>(
    interval: Duration,
    budget: Duration,
    mut attempt: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let started = Instant::now();

    loop {
        let error = match attempt().await {
            Ok(value) => return RetryOutcome::Ready(value),
            Err(e) => e,
        };

        if started.elapsed() >= budget {
            return RetryOutcome::TimedOut {
                waited: started.elapsed(),
                last_error: Some(error),
            };
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn never_ready_times_out_within_budget_plus_interval() {
        let interval = Duration::from_millis(250);
        let budget = Duration::from_millis(5000);
        let started = Instant::now();

        let outcome: RetryOutcome<(), &str> =
            until_ready(interval, budget, || async { Err("connection refused") }).await;

        let elapsed = started.elapsed();
        match outcome {
            RetryOutcome::TimedOut { waited, last_error } => {
                assert_eq!(last_error, Some("connection refused"));
                assert!(waited >= budget);
                assert!(elapsed <= budget + interval, "overran: {elapsed:?}");
            }
            RetryOutcome::Ready(_) => panic!("target never becomes ready"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_first_attempt_without_sleeping() {
        let started = Instant::now();
        let outcome: RetryOutcome<u32, &str> = until_ready(
            Duration::from_secs(1),
            Duration::from_secs(10),
            || async { Ok(99) },
        )
        .await;

        assert!(matches!(outcome, RetryOutcome::Ready(99)));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn becomes_ready_after_a_few_attempts() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);

        let outcome = until_ready(Duration::from_millis(100), Duration::from_secs(5), || {
            let seen = Arc::clone(&seen);
            async move {
                if seen.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err("not yet")
                } else {
                    Ok("up")
                }
            }
        })
        .await;

        assert!(matches!(outcome, RetryOutcome::Ready("up")));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_reports_last_error() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);

        let outcome: RetryOutcome<(), String> =
            until_ready(Duration::from_millis(100), Duration::from_millis(350), || {
                let seen = Arc::clone(&seen);
                async move { Err(format!("attempt {}", seen.fetch_add(1, Ordering::SeqCst))) }
            })
            .await;

        match outcome {
            RetryOutcome::TimedOut { last_error, .. } => {
                // Attempts run at t=0,100,200,300,400; the budget check after
                // the attempt at t=400 trips, so that attempt is the cause.
                assert_eq!(last_error.as_deref(), Some("attempt 4"));
            }
            RetryOutcome::Ready(_) => panic!("never succeeds"),
        }
    }
}
