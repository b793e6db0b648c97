//! Exponential backoff for the item detail fetch.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::configs::client_config::ItemRetryConfig;
use crate::retrieve::errors::MenuResult;

/// Delay after failed attempt `attempt` (0-based): `base * 2^attempt`,
/// capped at `max_delay_ms`.
pub fn backoff_delay(policy: &ItemRetryConfig, attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    let ms = policy.base_delay_ms.saturating_mul(factor).min(policy.max_delay_ms);
    Duration::from_millis(ms)
}

/// Runs `op` and retries retryable failures up to `policy.max_retries` times.
///
/// `op` receives the 0-based attempt number. Not-found, validation and
/// input errors are returned immediately.
pub async fn retry_with_backoff<T, F, Fut>(policy: &ItemRetryConfig, mut op: F) -> MenuResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = MenuResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries && e.is_retryable() => {
                let delay = backoff_delay(policy, attempt);
                warn!(
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "fetch failed; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
