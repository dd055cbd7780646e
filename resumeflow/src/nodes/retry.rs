//! Bounded retry with exponential backoff for external calls.

use std::future::Future;
use std::time::Duration;

use crate::error::AgentError;

/// Retry budget: `max_retries` extra attempts after the first, sleeping
/// `base_delay * 2^(n-1)` before retry `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Total attempts allowed, first call included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff before retry `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor)
    }

    /// Runs `op(attempt)` (attempt is 1-based) until it succeeds or the budget is spent.
    /// Returns the last error when every attempt failed.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, AgentError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AgentError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts() => {
                    log_retry(label, attempt, &e);
                    let delay = self.delay_for(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn log_retry(label: &str, attempt: u32, error: &AgentError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(label = label, attempt = attempt, %error, "Attempt failed, retrying");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[WARN] {} attempt {} failed, retrying: {}", label, attempt, error);
}
