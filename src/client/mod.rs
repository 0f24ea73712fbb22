//! Webhook Delivery Client
//!
//! Emits event notifications to the TurnStay webhook-service.
//!
//! # Architecture
//!
//! 1. **Client** (`WebhookClient`): validates configuration, builds the payload
//! 2. **Transport** (`transport`): `DeliveryTransport` trait, HTTP and queue
//!    implementations
//! 3. **Retry** (`retry`): typed attempt outcomes and the backoff driver
//!
//! # Example
//!
//! ```ignore
//! use turnstay_webhooks::{ClientConfig, WebhookClient};
//!
//! let client = WebhookClient::new(ClientConfig::http("http://localhost:8000"))?;
//! let response = client
//!     .trigger("payment_intent.succeeded", data, None)
//!     .await?;
//! client.close().await;
//! ```
//!
//! Dropping the client releases its connections as well, so an early return
//! or `?` never leaks them.

pub mod config;
pub mod http;
pub mod payload;
pub mod queue;
pub mod retry;
#[cfg(feature = "sqs")]
pub mod sqs;
pub mod transport;

pub use config::{ClientConfig, DeliveryMode};
pub use http::HttpTransport;
pub use payload::DeliveryPayload;
pub use queue::{BackendError, QueueBackend, QueueTransport};
pub use retry::{AttemptOutcome, RetryPolicy};
pub use transport::DeliveryTransport;

use crate::error::{Result, WebhookError};
use crate::JsonObject;
use serde_json::Value;
use std::sync::Arc;

/// Async client for emitting webhook events
///
/// `trigger` takes `&self`; one client can serve concurrent tasks.
pub struct WebhookClient {
    config: ClientConfig,
    transport: Arc<dyn DeliveryTransport>,
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("config", &self.config)
            .field("connected", &self.transport.is_connected())
            .finish()
    }
}

impl WebhookClient {
    /// Create a client for the configured mode
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Configuration`] if the configuration is
    /// invalid, or if queue mode is requested from a build without the `sqs`
    /// feature.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let transport: Arc<dyn DeliveryTransport> = match config.mode {
            DeliveryMode::Http => Arc::new(HttpTransport::new(
                config.base_url.as_deref().unwrap_or_default(),
                config.timeout_duration(),
                RetryPolicy::new(config.max_retries, config.retry_delay_duration()),
            )),
            DeliveryMode::Queue => queue_transport(&config)?,
        };

        tracing::debug!(mode = %config.mode, "Created webhook client");
        Ok(Self { config, transport })
    }

    /// Create a client with a caller-supplied transport
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Configuration`] if the configuration is invalid
    /// or its mode differs from the transport's.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn DeliveryTransport>) -> Result<Self> {
        config.validate()?;

        if transport.mode() != config.mode {
            return Err(WebhookError::Configuration(format!(
                "Transport implements {} mode but configuration selects {} mode",
                transport.mode(),
                config.mode
            )));
        }

        Ok(Self { config, transport })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the delivery mode
    pub fn mode(&self) -> DeliveryMode {
        self.config.mode
    }

    /// Check if the transport currently holds open connections
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Emit a webhook event
    ///
    /// # Arguments
    ///
    /// * `event_type` - Event type (e.g. "payment_intent.succeeded")
    /// * `data` - Event payload, normally `{"object": {...}}`
    /// * `name` - Optional human-readable name, defaults to `event_type`
    ///
    /// # Returns
    ///
    /// The webhook-service response in HTTP mode, `None` in queue mode.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Delivery`] once retries are exhausted or on a
    /// non-retryable failure.
    pub async fn trigger(
        &self,
        event_type: &str,
        data: JsonObject,
        name: Option<&str>,
    ) -> Result<Option<Value>> {
        let payload = DeliveryPayload::new(event_type, data, name.map(str::to_string));
        self.transport.deliver(&payload).await
    }

    /// Close the underlying connections
    ///
    /// The client stays usable; the next `trigger` reopens them.
    pub async fn close(&self) {
        self.transport.close().await;
    }
}

#[cfg(feature = "sqs")]
fn queue_transport(config: &ClientConfig) -> Result<Arc<dyn DeliveryTransport>> {
    Ok(Arc::new(QueueTransport::new(
        config.queue_url.clone().unwrap_or_default(),
        Arc::new(sqs::SqsQueue::new(config.region.clone())),
    )))
}

#[cfg(not(feature = "sqs"))]
fn queue_transport(_config: &ClientConfig) -> Result<Arc<dyn DeliveryTransport>> {
    Err(WebhookError::Configuration(
        "SQS support is required for queue mode. Rebuild with: cargo build --features sqs".into(),
    ))
}
