//! Bounded exponential backoff for transient [`crate::error::StoreError`]s
//! (§7 "StoreError ... transient is retried with bounded exponential
//! backoff at the store-port level").

use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;

const MAX_ATTEMPTS: u32 = 3;
const BASE_DELAY_MS: u64 = 50;

/// Retry `op` up to [`MAX_ATTEMPTS`] times while it returns a transient
/// error, doubling the delay each attempt starting at [`BASE_DELAY_MS`].
/// A fatal error, or exhausting the attempt budget, returns immediately.
pub async fn with_backoff<T, F, Fut>(mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < MAX_ATTEMPTS => {
                let delay = BASE_DELAY_MS * 2u64.pow(attempt);
                tracing::warn!(attempt, delay_ms = delay, "retrying transient store failure");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, StoreError> = with_backoff(|| async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(StoreError::Transient("not yet".into()))
            } else {
                Ok("done")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), StoreError> = with_backoff(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Fatal("bad schema".into()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), StoreError> = with_backoff(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Transient("still down".into()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }
}
