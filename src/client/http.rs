//! HTTP Delivery Transport
//!
//! POSTs events as JSON to `{base_url}/internal/webhooks/trigger`.
//!
//! # Retry classification
//!
//! | Attempt result                    | Outcome                        |
//! |-----------------------------------|--------------------------------|
//! | status < 500 with a JSON body     | returned to the caller         |
//! | 3xx                               | returned as is, not followed   |
//! | status >= 500                     | retried                        |
//! | timeout / connection failure      | retried                        |
//! | anything else (bad body, builder) | fails immediately, no retry    |
//!
//! 4xx responses are final: retrying a rejected request cannot succeed.
//!
//! The underlying `reqwest::Client` (and its connection pool) is created on
//! first use, dropped by [`close`](DeliveryTransport::close) and recreated by
//! the next delivery.

use super::config::DeliveryMode;
use super::payload::DeliveryPayload;
use super::retry::{AttemptOutcome, RetryPolicy};
use super::transport::DeliveryTransport;
use crate::error::{Result, WebhookError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// Path of the trigger endpoint on the webhook-service
pub const TRIGGER_PATH: &str = "/internal/webhooks/trigger";

/// HTTP transport for the webhook-service
pub struct HttpTransport {
    /// Full trigger endpoint URL
    endpoint: String,

    /// Per-request timeout
    timeout: Duration,

    /// Backoff policy for transient failures
    retry: RetryPolicy,

    /// Lazily created client, `None` while closed
    client: Mutex<Option<reqwest::Client>>,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// No connection is opened until the first delivery.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Webhook-service URL (e.g. "http://localhost:8000")
    /// * `timeout` - Per-request timeout
    /// * `retry` - Retry policy for transient failures
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TRIGGER_PATH),
            timeout,
            retry,
            client: Mutex::new(None),
        }
    }

    /// Get the trigger endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Return the open client, creating it if closed
    ///
    /// The lock is held only while checking and building, never across a
    /// request, so concurrent deliveries share one pool.
    fn http_client(&self) -> Result<reqwest::Client> {
        let mut guard = self.client.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        // Redirects are returned to the caller, never followed
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| WebhookError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(timeout = ?self.timeout, "Opened webhook HTTP client");
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Perform one POST and classify the result
    async fn attempt(&self, payload: &DeliveryPayload, attempt: u32) -> AttemptOutcome<Value> {
        let client = match self.http_client() {
            Ok(client) => client,
            Err(e) => return AttemptOutcome::Terminal(e.to_string()),
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            event_type = %payload.event_type,
            attempt = attempt + 1,
            "Sending webhook trigger"
        );

        let response = match client.post(&self.endpoint).json(payload).send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(e),
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return classify_transport_error(e),
        };

        if status >= 500 {
            return AttemptOutcome::Retryable(format!("Server error {}: {}", status, body));
        }

        tracing::debug!(status, "Webhook trigger answered");

        match serde_json::from_str(&body) {
            Ok(parsed) => AttemptOutcome::Completed(parsed),
            Err(e) => AttemptOutcome::Terminal(format!(
                "Invalid JSON response (status {}): {}",
                status, e
            )),
        }
    }
}

#[async_trait]
impl DeliveryTransport for HttpTransport {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<Option<Value>> {
        let transport = self;
        let response = self
            .retry
            .run(move |attempt| transport.attempt(payload, attempt))
            .await?;
        Ok(Some(response))
    }

    async fn close(&self) {
        let closed = self
            .client
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if closed.is_some() {
            tracing::debug!("Closed webhook HTTP client");
        }
    }

    fn is_connected(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Http
    }
}

/// Timeouts and connection failures are transient; other transport errors are not
fn classify_transport_error(error: reqwest::Error) -> AttemptOutcome<Value> {
    if error.is_timeout() || error.is_connect() {
        AttemptOutcome::Retryable(error.to_string())
    } else {
        AttemptOutcome::Terminal(error.to_string())
    }
}
