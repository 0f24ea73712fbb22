//! Webhook Signature Verification
//!
//! Inbound webhooks carry a `Turnstay-Signature` header of the form
//!
//! ```text
//! t=1700000000, v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! The signature is a lowercase hex HMAC-SHA256 over `{t}.{raw body}`, keyed
//! with the endpoint secret. Binding the timestamp into the signed message means
//! an old body cannot be replayed under a fresh timestamp.
//!
//! `v1` may appear more than once while a secret is being rotated; any match
//! is accepted. If `t` appears more than once the last value is used.

use crate::error::{Result, WebhookError};
use crate::JsonObject;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Default replay window in seconds (5 minutes)
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// HTTP header carrying the signature
pub const SIGNATURE_HEADER: &str = "Turnstay-Signature";

/// Parsed signature header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp exactly as it appeared in the header
    pub timestamp: String,
    /// Candidate `v1` signatures in header order
    pub signatures: Vec<String>,
}

impl SignatureHeader {
    /// Parse a signature header
    ///
    /// Items without `=` and unknown keys are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::SignatureVerification`] if the header has no
    /// `t` item or no `v1` item.
    pub fn parse(header: &str) -> Result<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for item in header.split(',') {
            let Some((key, value)) = item.trim().split_once('=') else {
                continue;
            };

            match key.trim() {
                "t" => timestamp = Some(value.trim().to_string()),
                "v1" => signatures.push(value.trim().to_string()),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            WebhookError::SignatureVerification("Missing timestamp in signature header".into())
        })?;

        if signatures.is_empty() {
            return Err(WebhookError::SignatureVerification(
                "No v1 signature found in header".into(),
            ));
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

impl std::fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}", self.timestamp)?;
        for signature in &self.signatures {
            write!(f, ", v1={}", signature)?;
        }
        Ok(())
    }
}

/// Compute the hex HMAC-SHA256 of `{timestamp}.{payload}`
pub fn compute_signature(secret: &str, timestamp: &str, payload: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC key can be of any size, as per crate documentation"),
    };

    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Sign a payload with the current timestamp and return the header value
pub fn sign(secret: &str, payload: &str) -> String {
    sign_with_timestamp(secret, payload, chrono::Utc::now().timestamp())
}

/// Sign a payload with a specific timestamp and return the header value
pub fn sign_with_timestamp(secret: &str, payload: &str, timestamp: i64) -> String {
    let timestamp = timestamp.to_string();
    let signature = compute_signature(secret, &timestamp, payload);
    SignatureHeader {
        timestamp,
        signatures: vec![signature],
    }
    .to_string()
}

/// Verify a webhook signature and return the parsed payload
///
/// # Arguments
///
/// * `payload` - Raw request body, exactly as received
/// * `signature_header` - Value of the `Turnstay-Signature` header
/// * `secret` - Endpoint secret (`whsec_...`)
/// * `tolerance` - Maximum timestamp age in seconds; `0` disables the check
///
/// # Errors
///
/// * [`WebhookError::SignatureVerification`] - malformed header or no match
/// * [`WebhookError::TimestampTooOld`] - timestamp outside the replay window
/// * [`WebhookError::Payload`] / [`WebhookError::PayloadEncoding`] - the
///   signature matched but the body is not a UTF-8 JSON object
pub fn verify(
    payload: impl AsRef<[u8]>,
    signature_header: &str,
    secret: &str,
    tolerance: u64,
) -> Result<JsonObject> {
    verify_at(
        payload.as_ref(),
        signature_header,
        secret,
        tolerance,
        chrono::Utc::now().timestamp(),
    )
}

pub(crate) fn verify_at(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    tolerance: u64,
    now: i64,
) -> Result<JsonObject> {
    let payload = std::str::from_utf8(payload)?;
    let header = SignatureHeader::parse(signature_header)?;

    if tolerance > 0 {
        let age = timestamp_age(&header.timestamp, now).ok_or_else(|| {
            WebhookError::SignatureVerification(format!(
                "Invalid timestamp in signature header: {}",
                header.timestamp
            ))
        })?;

        if age > tolerance {
            tracing::debug!(age, tolerance, "Webhook timestamp outside tolerance");
            return Err(WebhookError::TimestampTooOld { age, tolerance });
        }
    }

    let expected = compute_signature(secret, &header.timestamp, payload);

    let matched = header
        .signatures
        .iter()
        .any(|candidate| constant_time_eq(expected.as_bytes(), candidate.as_bytes()));

    if !matched {
        tracing::debug!(
            candidates = header.signatures.len(),
            "No webhook signature matched"
        );
        return Err(WebhookError::SignatureVerification(
            "No matching signature found".into(),
        ));
    }

    Ok(serde_json::from_str(payload)?)
}

/// Seconds between `now` and a header timestamp, `None` if it is not an integer
///
/// Integers beyond `i64` are still timestamps, just infinitely far away.
fn timestamp_age(timestamp: &str, now: i64) -> Option<u64> {
    if let Ok(timestamp) = timestamp.parse::<i64>() {
        return Some(now.abs_diff(timestamp));
    }

    let digits = timestamp.strip_prefix(['-', '+']).unwrap_or(timestamp);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(u64::MAX)
    } else {
        None
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
