// Exponential backoff retry driver for webhook delivery
//
// Each attempt reports a typed outcome; only `Retryable` outcomes are retried.
// Delays are `base_delay * 2^attempt` with attempt counted from 0, so a client
// with a 1s base waits 1s, 2s, 4s ... between attempts.

use crate::error::{Result, WebhookError};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Outcome of a single delivery attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome<T> {
    /// Final answer from the receiver (any status below 500)
    Completed(T),
    /// Transient failure: server error, timeout or connection failure
    Retryable(String),
    /// Failure that retrying cannot fix
    Terminal(String),
}

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Total attempts including the first one
    pub fn total_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }

    /// Delay to wait after the given zero-indexed failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }

    /// Drive `operation` until it completes, fails terminally or runs out of attempts
    ///
    /// `operation` receives the zero-indexed attempt number.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Delivery`] on a terminal outcome or once every
    /// attempt has failed; the message embeds the last failure.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = AttemptOutcome<T>>,
    {
        let total = self.total_attempts();
        let mut last_error = String::new();

        for attempt in 0..=self.max_retries {
            let number = u64::from(attempt) + 1;

            match operation(attempt).await {
                AttemptOutcome::Completed(value) => {
                    if attempt > 0 {
                        info!(
                            "Webhook trigger succeeded on attempt {} after {} retries",
                            number, attempt
                        );
                    }
                    return Ok(value);
                }
                AttemptOutcome::Terminal(reason) => {
                    error!(attempt = number, "Webhook trigger failed: {}", reason);
                    return Err(WebhookError::Delivery(format!(
                        "Unexpected error: {}",
                        reason
                    )));
                }
                AttemptOutcome::Retryable(reason) => {
                    last_error = reason;
                }
            }

            if attempt < self.max_retries {
                let delay = self.delay_for(attempt);
                warn!(
                    "Webhook trigger attempt {}/{} failed, retrying in {:.1}s: {}",
                    number,
                    total,
                    delay.as_secs_f64(),
                    last_error
                );
                sleep(delay).await;
            } else {
                debug!("Webhook trigger attempt {}/{} failed: {}", number, total, last_error);
            }
        }

        error!("Webhook trigger failed after {} attempts", total);
        Err(WebhookError::Delivery(format!(
            "Failed to trigger webhook after {} attempts: {}",
            total, last_error
        )))
    }
}
