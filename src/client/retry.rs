//! Bounded retry with fixed backoff
//!
//! A generic combinator applied uniformly to the fetch operations: any
//! failure is retried up to the attempt ceiling with a fixed delay between
//! attempts.

use std::future::Future;
use std::time::Duration;

use log::debug;

/// Run `op` until it succeeds or `max_attempts` attempts are exhausted,
/// sleeping `delay` between attempts. The final error is returned as-is.
pub async fn with_retry<T, E, F, Fut>(max_attempts: usize, delay: Duration, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    debug_assert!(max_attempts > 0);

    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                debug!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, max_attempts, err, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result: Result<u32, String> = with_retry(3, Duration::from_millis(10), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_from_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result: Result<u32, String> = with_retry(3, Duration::from_secs(1), move || {
            let c = c.clone();
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("transient".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result: Result<u32, String> = with_retry(3, Duration::from_secs(1), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("permanent".to_string())
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "permanent");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_between_attempts() {
        let start = tokio::time::Instant::now();

        let _: Result<(), String> = with_retry(3, Duration::from_secs(1), || async {
            Err("nope".to_string())
        })
        .await;

        // Two sleeps between three attempts
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
