use std::future::Future;

use tracing::warn;

use crate::error::Result;

/// Runs `op` until it succeeds, fails with something other than a
/// concurrency conflict, or `max_attempts` runs have conflicted.
///
/// `op` receives the attempt number, starting at 1, and must redo the whole
/// load-reconcile-save cycle: state loaded by an earlier attempt is stale.
pub async fn retry_on_conflict<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Err(err) if err.is_conflict() && attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %err, "conflicting update, retrying");
                attempt += 1;
                tokio::task::yield_now().await;
            }
            outcome => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_conflicts() {
        let calls = AtomicU32::new(0);
        let value = retry_on_conflict(3, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(ServiceError::ConcurrencyConflict("stale".into()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let err = retry_on_conflict(2, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(ServiceError::ConcurrencyConflict("stale".into())) }
        })
        .await
        .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let err = retry_on_conflict(5, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(ServiceError::invalid_argument("nope")) }
        })
        .await
        .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
