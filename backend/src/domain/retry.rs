//! Bounded retry for optimistic-concurrency conflicts.

use std::future::Future;

use tracing::warn;

use super::Error;

/// How often a conflicting operation is re-run before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Values below 1 act as 1.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self { max_attempts: 1 }
    }

    /// Run `attempt` until it succeeds, fails with a non-retryable error, or
    /// the attempt budget is exhausted.
    ///
    /// Only [`Error::is_retryable`] errors trigger another attempt. The last
    /// error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut attempt: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut tries = 1;
        loop {
            match attempt().await {
                Err(err) if err.is_retryable() && tries < max_attempts => {
                    warn!(operation, attempt = tries, error = %err, "retrying after conflict");
                    tries += 1;
                    tokio::task::yield_now().await;
                }
                other => return other,
            }
        }
    }
}
