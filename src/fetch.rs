// ABOUTME: Bounded retry with linear backoff for provider fetch operations
// ABOUTME: Authentication failures abort immediately; exhausted retries degrade to "no data"
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::errors::{SyncError, SyncResult};

/// Retry behavior applied uniformly to every provider operation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Base delay; the wait grows linearly with the attempt index
    pub base_delay: Duration,
    /// Errors this predicate matches are never retried and propagate
    /// immediately
    pub non_retryable: fn(&SyncError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
            non_retryable: SyncError::is_fatal,
        }
    }
}

impl RetryPolicy {
    /// Delay before the next try after `attempt` (1-based) failures
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Runs provider operations under a shared retry policy.
///
/// The pauses between attempts also keep the request rate within the
/// upstream provider's tolerance.
#[derive(Debug, Clone)]
pub struct Fetcher {
    policy: RetryPolicy,
}

impl Fetcher {
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Invokes `op` up to the policy bound.
    ///
    /// Returns `Ok(None)` when every attempt failed with a retryable error,
    /// so a single failing metric never aborts the day's record.
    ///
    /// # Errors
    ///
    /// Propagates the first error matching the policy's non-retryable
    /// predicate (authentication failures by default).
    pub async fn fetch<F, Fut>(&self, metric: &str, op: F) -> SyncResult<Option<Value>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SyncResult<Value>>,
    {
        for attempt in 1..=self.policy.max_attempts {
            match op().await {
                Ok(raw) => return Ok(Some(raw)),
                Err(err) if (self.policy.non_retryable)(&err) => return Err(err),
                Err(err) => {
                    if attempt < self.policy.max_attempts {
                        let delay = self.policy.backoff(attempt);
                        warn!(
                            metric,
                            attempt,
                            max_attempts = self.policy.max_attempts,
                            delay_secs = delay.as_secs(),
                            error = %err,
                            "fetch failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        warn!(
                            metric,
                            attempts = self.policy.max_attempts,
                            error = %err,
                            "fetch failed after all attempts, treating metric as missing"
                        );
                    }
                }
            }
        }
        Ok(None)
    }
}
