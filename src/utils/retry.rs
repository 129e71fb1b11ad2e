//! Retry helper for remote API calls: per-attempt timeout, exponential
//! backoff with full jitter. Used only by the `remote` adapters; core
//! pipeline components always see a single logical attempt.

use anyhow::Result;
use rand::Rng;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Per-attempt timeout (ms).
pub const REMOTE_TIMEOUT_MS: u64 = 15_000;
/// Max attempts including the first.
pub const REMOTE_MAX_ATTEMPTS: usize = 3;
const BACKOFF_BASE_MS: u64 = 200;
const BACKOFF_MAX_MS: u64 = 3_000;

/// Run `op` until it succeeds or `REMOTE_MAX_ATTEMPTS` is exhausted.
pub async fn call_remote_with_retry<F, Fut, T>(op: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = match timeout(Duration::from_millis(REMOTE_TIMEOUT_MS), op()).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "remote call timed out after {REMOTE_TIMEOUT_MS}ms"
            )),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= REMOTE_MAX_ATTEMPTS => return Err(e),
            Err(e) => {
                let backoff_ms = backoff_with_jitter(attempt);
                tracing::debug!(
                    attempt,
                    max_attempts = REMOTE_MAX_ATTEMPTS,
                    backoff_ms,
                    error = %e,
                    "remote call failed, retrying"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// random(0, min(cap, base * 2^(attempt-1)))
fn backoff_with_jitter(attempt: usize) -> u64 {
    let exp = BACKOFF_BASE_MS.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1) as u32));
    let capped = exp.min(BACKOFF_MAX_MS);
    rand::thread_rng().gen_range(0..=capped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_backoff_stays_within_bounds() {
        assert!(backoff_with_jitter(1) <= BACKOFF_BASE_MS);
        assert!(backoff_with_jitter(2) <= BACKOFF_BASE_MS * 2);
        assert!(backoff_with_jitter(30) <= BACKOFF_MAX_MS);
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let result = call_remote_with_retry(|| async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let calls = AtomicUsize::new(0);
        let result = call_remote_with_retry(|| async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(anyhow::anyhow!("transient"))
            } else {
                Ok("ok")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let result: Result<()> =
            call_remote_with_retry(|| async { Err(anyhow::anyhow!("permanent")) }).await;
        assert!(result.unwrap_err().to_string().contains("permanent"));
    }
}
