//! TurnStay Webhooks SDK
//!
//! Two halves:
//!
//! - **Emitting** ([`client`]): [`WebhookClient`] sends event notifications to
//!   the webhook-service over HTTP with retry/backoff, or enqueues them.
//! - **Receiving** ([`signature`], [`event`]): verify a signed inbound payload
//!   and turn it into a typed [`Event`].
//!
//! ```ignore
//! use turnstay_webhooks::{Event, DEFAULT_TOLERANCE_SECS};
//!
//! let event = Event::construct_from(body, header, &secret, DEFAULT_TOLERANCE_SECS)?;
//! println!("received {}", event);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod signature;

/// Free-form JSON mapping used for event payloads (insertion-ordered)
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

pub use client::{ClientConfig, DeliveryMode, WebhookClient};
pub use error::{Result, WebhookError};
pub use event::{Event, EventData};
pub use signature::{SignatureHeader, DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER};


// Property-based tests module
#[cfg(test)]
mod proptests;
