//! Retry governor for network-touching driver operations.
//!
//! Every attempt is bounded by a timeout. Transient failures (see
//! [`DriverErrorKind::is_transient`](crate::driver::DriverErrorKind::is_transient))
//! are retried after `base_delay × attempt`; anything else is returned at once.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app::{ClippingError, Result};
use crate::driver::DriverError;

/// `[retry]` section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per operation, including the first (default: 5)
    pub max_attempts: u32,

    /// Backoff unit in milliseconds; attempt `n` waits `n × base_delay_ms` (default: 3000)
    pub base_delay_ms: u64,

    /// Upper bound for a single attempt in seconds (default: 90)
    pub operation_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 3000,
            operation_timeout_secs: 90,
        }
    }
}

/// Resolved retry parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            attempt_timeout: Duration::from_secs(config.operation_timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryGovernor {
    policy: RetryPolicy,
}

impl RetryGovernor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Delay before the attempt following failed attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.policy.base_delay * attempt
    }

    /// Run `operation` until it succeeds, fails fatally, or runs out of attempts
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, DriverError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match tokio::time::timeout(self.policy.attempt_timeout, operation()).await
            {
                Ok(result) => result,
                Err(_) => Err(DriverError::timed_out(format!(
                    "{} exceeded {:?}",
                    label, self.policy.attempt_timeout
                ))),
            };

            let err = match outcome {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", label, attempt);
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_transient() {
                return Err(ClippingError::Driver(err));
            }

            if attempt >= max_attempts {
                warn!("{} gave up after {} attempts: {}", label, attempt, err);
                return Err(ClippingError::RetryExhausted {
                    label: label.to_string(),
                    attempts: attempt,
                    source: err,
                });
            }

            let delay = self.backoff(attempt);
            warn!(
                "{} failed (attempt {}/{}), retrying in {:?}: {}",
                label, attempt, max_attempts, delay, err
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
