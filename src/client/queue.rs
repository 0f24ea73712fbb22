// Queue delivery transport
//
// Serializes the payload and enqueues it once. Durability and redelivery are
// the queue service's job, so there is no retry loop here.

use super::config::DeliveryMode;
use super::payload::DeliveryPayload;
use super::transport::DeliveryTransport;
use crate::error::{Result, WebhookError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Error returned by a queue backend
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Message-queue capability used by [`QueueTransport`]
#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Enqueue one message body onto the named queue
    async fn enqueue(&self, queue_url: &str, body: String) -> std::result::Result<(), BackendError>;
}

/// Queue transport
pub struct QueueTransport {
    queue_url: String,
    backend: Arc<dyn QueueBackend>,
}

impl QueueTransport {
    /// Create a queue transport for `queue_url` using `backend`
    pub fn new(queue_url: impl Into<String>, backend: Arc<dyn QueueBackend>) -> Self {
        Self {
            queue_url: queue_url.into(),
            backend,
        }
    }

    /// Get the queue URL
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl DeliveryTransport for QueueTransport {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<Option<Value>> {
        let body = serde_json::to_string(payload)
            .map_err(|e| WebhookError::Delivery(format!("Failed to serialize event: {}", e)))?;

        self.backend
            .enqueue(&self.queue_url, body)
            .await
            .map_err(|e| WebhookError::Delivery(format!("Failed to send to SQS: {}", e)))?;

        tracing::info!("Webhook event sent to queue: {}", payload.event_type);
        Ok(None)
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Queue
    }
}
