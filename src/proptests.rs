//! Property-Based Tests
//!
//! Invariants checked over random inputs:
//!
//! - **Signing**: anything signed with a secret verifies with that secret and
//!   nothing else; any change to the payload breaks the signature
//! - **Replay window**: acceptance depends only on `|now - t|` against the
//!   tolerance
//! - **Events**: `from_dict(to_dict(e))` reproduces `e`
//! - **Backoff**: delays double per attempt from the base delay
//!
//! # Running the Tests
//!
//! ```bash
//! cargo test --lib proptests
//! ```

use proptest::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;

use crate::client::RetryPolicy;
use crate::error::WebhookError;
use crate::event::{Event, EventData};
use crate::signature::{self, SignatureHeader};
use crate::JsonObject;

const NOW: i64 = 1_760_000_000;

// Helper: Generate arbitrary scalar JSON values
fn arb_json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[ -~]{0,16}".prop_map(Value::String),
    ]
}

// Helper: Generate small JSON objects
fn arb_json_object() -> impl Strategy<Value = JsonObject> {
    prop::collection::btree_map("[a-z_]{1,8}", arb_json_scalar(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

// Helper: Generate signed payload bodies
fn arb_payload() -> impl Strategy<Value = String> {
    arb_json_object().prop_map(|obj| Value::Object(obj).to_string())
}

fn arb_secret() -> impl Strategy<Value = String> {
    "whsec_[A-Za-z0-9]{8,32}"
}

fn arb_event() -> impl Strategy<Value = Event> {
    (
        "evt_[a-z0-9]{4,12}",
        "[a-z]{3,10}\\.[a-z_]{3,12}",
        proptest::option::of("20[0-9]{2}-0[1-9]-1[0-9]T00:00:00Z"),
        proptest::option::of("20[0-9]{2}-0[1-9]-1[0-9]"),
        arb_json_object(),
        proptest::option::of(arb_json_object()),
    )
        .prop_map(
            |(id, event_type, created_at, api_version, object, previous_attributes)| Event {
                id,
                event_type,
                created_at,
                api_version,
                data: EventData {
                    object,
                    // Empty mappings are omitted on the wire and read back as None
                    previous_attributes: previous_attributes.filter(|p| !p.is_empty()),
                },
            },
        )
}

proptest! {
    #[test]
    fn prop_signed_payload_verifies(
        secret in arb_secret(),
        payload in arb_payload(),
        skew in -300_i64..=300,
    ) {
        let header = signature::sign_with_timestamp(&secret, &payload, NOW + skew);
        let parsed = signature::verify_at(payload.as_bytes(), &header, &secret, 300, NOW).unwrap();
        let expected: JsonObject = serde_json::from_str(&payload).unwrap();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn prop_wrong_secret_is_rejected(
        secret in arb_secret(),
        other in arb_secret(),
        payload in arb_payload(),
    ) {
        prop_assume!(secret != other);
        let header = signature::sign_with_timestamp(&secret, &payload, NOW);
        let err = signature::verify_at(payload.as_bytes(), &header, &other, 300, NOW).unwrap_err();
        let is_signature_error = matches!(err, WebhookError::SignatureVerification(_));
        prop_assert!(is_signature_error);
    }

    #[test]
    fn prop_tampered_payload_is_rejected(
        secret in arb_secret(),
        payload in arb_payload(),
        extra in "[a-z]{1,8}",
    ) {
        let header = signature::sign_with_timestamp(&secret, &payload, NOW);
        let mut tampered: JsonObject = serde_json::from_str(&payload).unwrap();
        tampered.insert(format!("{}_tampered", extra), json!(true));
        let tampered = Value::Object(tampered).to_string();

        let err = signature::verify_at(tampered.as_bytes(), &header, &secret, 0, NOW).unwrap_err();
        let is_signature_error = matches!(err, WebhookError::SignatureVerification(_));
        prop_assert!(is_signature_error);
    }

    #[test]
    fn prop_tolerance_window(
        secret in arb_secret(),
        skew in -10_000_i64..10_000,
        tolerance in 1_u64..5_000,
    ) {
        let payload = r#"{"type":"payment_intent.succeeded"}"#;
        let header = signature::sign_with_timestamp(&secret, payload, NOW + skew);
        let result = signature::verify_at(payload.as_bytes(), &header, &secret, tolerance, NOW);

        if skew.unsigned_abs() <= tolerance {
            prop_assert!(result.is_ok());
        } else {
            let too_old = matches!(
                result,
                Err(WebhookError::TimestampTooOld { age, tolerance: t })
                    if age == skew.unsigned_abs() && t == tolerance
            );
            prop_assert!(too_old);
        }
    }

    #[test]
    fn prop_zero_tolerance_accepts_any_timestamp(
        secret in arb_secret(),
        timestamp in any::<i64>(),
    ) {
        let payload = "{}";
        let header = signature::sign_with_timestamp(&secret, payload, timestamp);
        prop_assert!(signature::verify_at(payload.as_bytes(), &header, &secret, 0, NOW).is_ok());
    }

    #[test]
    fn prop_header_display_round_trip(
        timestamp in any::<i64>(),
        signatures in prop::collection::vec("[0-9a-f]{64}", 1..4),
    ) {
        let header = SignatureHeader {
            timestamp: timestamp.to_string(),
            signatures,
        };
        let reparsed = SignatureHeader::parse(&header.to_string()).unwrap();
        prop_assert_eq!(reparsed, header);
    }

    #[test]
    fn prop_event_round_trip(event in arb_event()) {
        let rebuilt = Event::from_dict(&event.to_dict());
        prop_assert_eq!(rebuilt, event);
    }

    #[test]
    fn prop_backoff_doubles(base_ms in 1_u64..1_000, attempt in 0_u32..16) {
        let policy = RetryPolicy::new(3, Duration::from_millis(base_ms));
        prop_assert_eq!(policy.delay_for(0), Duration::from_millis(base_ms));
        prop_assert_eq!(policy.delay_for(attempt + 1), policy.delay_for(attempt) * 2);
    }

    #[test]
    fn prop_total_attempts(max_retries in 0_u32..100) {
        let policy = RetryPolicy::new(max_retries, Duration::from_secs(1));
        prop_assert_eq!(policy.total_attempts(), u64::from(max_retries) + 1);
    }
}
