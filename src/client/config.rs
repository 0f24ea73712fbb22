//! Delivery Client Configuration
//!
//! Mode-specific requirements are checked by [`ClientConfig::validate`], which
//! the client runs at construction time.

use crate::error::{Result, WebhookError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport mode for outbound events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// POST to the webhook-service trigger endpoint
    #[default]
    Http,
    /// Enqueue onto a message queue
    #[serde(alias = "sqs")]
    Queue,
}

impl std::str::FromStr for DeliveryMode {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "http" => Ok(DeliveryMode::Http),
            "queue" | "sqs" => Ok(DeliveryMode::Queue),
            other => Err(WebhookError::Configuration(format!(
                "Invalid mode: {}. Must be 'http' or 'queue'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Http => f.write_str("http"),
            DeliveryMode::Queue => f.write_str("queue"),
        }
    }
}

/// Webhook client configuration
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::http("http://localhost:8000")
///     .max_retries(5)
///     .retry_delay(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Transport mode (http, queue)
    pub mode: DeliveryMode,

    /// Webhook-service base URL (required for HTTP mode)
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    pub timeout_secs: f64,

    /// Retries after the first attempt on transient failure
    pub max_retries: u32,

    /// Base backoff delay in seconds, doubled on each retry
    pub retry_delay_secs: f64,

    /// Queue URL (required for queue mode)
    pub queue_url: Option<String>,

    /// Queue region
    pub region: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::Http,
            base_url: None,
            timeout_secs: 5.0,
            max_retries: 3,
            retry_delay_secs: 1.0,
            queue_url: None,
            region: "eu-west-1".to_string(),
        }
    }
}

impl ClientConfig {
    /// HTTP mode configuration for the given webhook-service URL
    pub fn http(base_url: impl Into<String>) -> Self {
        Self {
            mode: DeliveryMode::Http,
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Queue mode configuration for the given queue URL
    pub fn queue(queue_url: impl Into<String>) -> Self {
        Self {
            mode: DeliveryMode::Queue,
            queue_url: Some(queue_url.into()),
            ..Self::default()
        }
    }

    /// Set the HTTP request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs_f64();
        self
    }

    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base backoff delay
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_secs = delay.as_secs_f64();
        self
    }

    /// Set the queue region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    /// Base backoff delay as a `Duration`
    pub fn retry_delay_duration(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Configuration`] if the mode-specific URL is
    /// missing or empty, or a duration is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            DeliveryMode::Http if is_blank(&self.base_url) => {
                return Err(WebhookError::Configuration(
                    "base_url is required for HTTP mode".into(),
                ));
            }
            DeliveryMode::Queue if is_blank(&self.queue_url) => {
                return Err(WebhookError::Configuration(
                    "queue_url is required for queue mode".into(),
                ));
            }
            _ => {}
        }

        for (name, secs) in [
            ("timeout_secs", self.timeout_secs),
            ("retry_delay_secs", self.retry_delay_secs),
        ] {
            // Anything a Duration cannot hold is rejected
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(WebhookError::Configuration(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, secs
                )));
            }
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
