use crate::audit::error::AuditResult;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry an operation while it fails with a transient error.
///
/// Only errors for which [`crate::AuditError::is_transient`] holds are
/// retried; anything else is returned immediately. Used by sources, never by
/// the scan pipeline itself.
pub async fn retry_transient<F, Fut, T>(
    max_retries: usize,
    operation_name: &str,
    mut operation: F,
) -> AuditResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AuditResult<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_transient() || attempt >= max_retries => return Err(e),
            Err(e) => {
                warn!(
                    "Retryable error in {} (attempt {}/{}): {}",
                    operation_name,
                    attempt + 1,
                    max_retries,
                    e
                );

                // Exponential backoff: 100ms, 200ms, 400ms, 800ms, 1600ms, ...
                let backoff_ms = 100 * (1u64 << attempt.min(10));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
            }
        }
    }
}
