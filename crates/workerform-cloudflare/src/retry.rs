use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// Fixed-delay retry schedule applied to every outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Pause between attempts. No backoff, no jitter.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// No retries at all.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Run `f` until it succeeds or the policy is exhausted.
///
/// Every retryable failure is treated the same, whether it is a 4xx, a 5xx or
/// a transport error. Non-retryable errors are returned immediately. Once
/// started, the loop runs to success or exhaustion.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut f: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(operation, attempt, "Request succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt <= policy.max_retries => {
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts = policy.max_attempts(),
                    error = %e,
                    "Request failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                tracing::error!(operation, attempt, error = %e, "Request failed");
                return Err(e);
            }
        }
    }
}
