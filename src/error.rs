//! Webhook SDK Error Types
//!
//! This module defines every error the SDK can surface, for both the outbound
//! client and inbound signature verification.

/// Convenience alias used throughout the crate
pub type Result<T, E = WebhookError> = std::result::Result<T, E>;

/// Error types for webhook emission and verification
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Invalid client construction or a queue backend missing from the build
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Event could not be delivered (retries exhausted or unexpected failure)
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Malformed signature header or no candidate signature matched
    #[error("Signature verification failed: {0}")]
    SignatureVerification(String),

    /// Signed timestamp is outside the replay window
    #[error("Timestamp is {age}s old, exceeds tolerance of {tolerance}s")]
    TimestampTooOld { age: u64, tolerance: u64 },

    /// Verified body is not a JSON object
    #[error("Invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Verified body is not valid UTF-8
    #[error("Webhook payload is not valid UTF-8: {0}")]
    PayloadEncoding(#[from] std::str::Utf8Error),
}

impl WebhookError {
    /// True for both verification kinds (signature mismatch and replay window)
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::SignatureVerification(_) | WebhookError::TimestampTooOld { .. }
        )
    }
}
