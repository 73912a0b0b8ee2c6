use crate::errors::ScoringError;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Linear backoff: attempt `n` (1-based) waits `n * backoff` before retrying.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// retry budget is spent. Returns the value and the number of attempts made.
pub(crate) async fn with_retries<T, F, Fut>(
    policy: RetryPolicy,
    response_id: &str,
    mut op: F,
) -> Result<(T, u32), ScoringError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScoringError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok((value, attempt)),
            Err(err) if err.is_retryable() && attempt <= policy.max_retries => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    response_id,
                    attempt,
                    kind = err.kind.as_str(),
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "scoring attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err.with_response_id(response_id)),
        }
    }
}
