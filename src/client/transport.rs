//! Delivery Transport Layer
//!
//! The client hands each [`DeliveryPayload`] to a transport. Two transports
//! ship with the crate:
//!
//! - [`HttpTransport`](super::http::HttpTransport): POST with retry/backoff
//! - [`QueueTransport`](super::queue::QueueTransport): single enqueue through a
//!   [`QueueBackend`](super::queue::QueueBackend)
//!
//! Transports are responsible only for moving the payload. Payload building
//! and configuration checks live in the client.

use super::config::DeliveryMode;
use super::payload::DeliveryPayload;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Transport trait for outbound webhook events
///
/// Implementations must be safe to share between concurrent `trigger()` calls.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Deliver one event
    ///
    /// # Returns
    ///
    /// The receiver's response body, or `None` when the transport has no
    /// response (queue delivery).
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<Option<Value>>;

    /// Release any open connection resources
    ///
    /// A later `deliver` reopens them.
    async fn close(&self) {}

    /// Check if connection resources are currently open
    fn is_connected(&self) -> bool;

    /// Mode this transport implements
    fn mode(&self) -> DeliveryMode;
}
