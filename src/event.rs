//! Typed Webhook Events
//!
//! Wire shape of an inbound notification:
//!
//! ```json
//! {
//!   "id": "evt_123",
//!   "object": "event",
//!   "type": "payment_intent.succeeded",
//!   "created_at": "2026-02-25T12:00:00",
//!   "api_version": "2026-01-01",
//!   "data": {
//!     "object": { "id": "pi_1", "amount": 5000 },
//!     "previous_attributes": { "amount": 4000 }
//!   }
//! }
//! ```
//!
//! Receivers should build events with [`Event::construct_from`], which checks
//! the signature first. [`Event::from_dict`] trusts its input.

use crate::error::Result;
use crate::signature;
use crate::JsonObject;
use serde_json::Value;

/// Data payload of a webhook event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventData {
    /// The resource the event is about (opaque)
    pub object: JsonObject,
    /// Fields that changed, present only for update events
    pub previous_attributes: Option<JsonObject>,
}

impl EventData {
    /// Build from a `{"object": ..., "previous_attributes": ...}` mapping
    pub fn from_dict(d: &JsonObject) -> Self {
        Self {
            object: d
                .get("object")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            previous_attributes: d.get("previous_attributes").and_then(Value::as_object).cloned(),
        }
    }

    fn to_value(&self) -> Value {
        let mut data = JsonObject::new();
        data.insert("object".into(), Value::Object(self.object.clone()));
        if let Some(previous) = self.previous_attributes.as_ref().filter(|p| !p.is_empty()) {
            data.insert("previous_attributes".into(), Value::Object(previous.clone()));
        }
        Value::Object(data)
    }
}

/// A TurnStay webhook event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    /// Dot-namespaced category, e.g. `payment_intent.succeeded`
    pub event_type: String,
    pub created_at: Option<String>,
    pub api_version: Option<String>,
    pub data: EventData,
}

impl Event {
    /// Verify the signature and construct an event from the raw payload
    ///
    /// # Arguments
    ///
    /// * `payload` - Raw request body
    /// * `signature_header` - Value of the `Turnstay-Signature` header
    /// * `secret` - Endpoint secret (`whsec_...`)
    /// * `tolerance` - Max timestamp age in seconds, `0` to disable
    ///
    /// # Errors
    ///
    /// Same as [`signature::verify`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// let event = Event::construct_from(body, header, &secret, DEFAULT_TOLERANCE_SECS)?;
    /// match event.event_type.as_str() {
    ///     "payment_intent.succeeded" => handle_payment(&event.data.object),
    ///     _ => {}
    /// }
    /// ```
    pub fn construct_from(
        payload: impl AsRef<[u8]>,
        signature_header: &str,
        secret: &str,
        tolerance: u64,
    ) -> Result<Self> {
        let parsed = signature::verify(payload, signature_header, secret, tolerance)?;
        Ok(Self::from_dict(&parsed))
    }

    /// Construct an event from an already-parsed mapping (no verification)
    ///
    /// A `data` mapping without an `object` key is taken as the object itself.
    pub fn from_dict(d: &JsonObject) -> Self {
        let data = match d.get("data") {
            Some(Value::Object(raw)) if raw.contains_key("object") => EventData::from_dict(raw),
            Some(Value::Object(raw)) => EventData {
                object: raw.clone(),
                previous_attributes: None,
            },
            _ => EventData::default(),
        };

        Self {
            id: d.get("id").and_then(stringify).unwrap_or_default(),
            event_type: d.get("type").and_then(stringify).unwrap_or_default(),
            created_at: d.get("created_at").and_then(stringify),
            api_version: d.get("api_version").and_then(stringify),
            data,
        }
    }

    /// Serialize back to the wire shape
    ///
    /// `created_at` is always present (null when unknown); `api_version` and
    /// `data.previous_attributes` are omitted when empty.
    pub fn to_dict(&self) -> JsonObject {
        let mut result = JsonObject::new();
        result.insert("id".into(), Value::String(self.id.clone()));
        result.insert("object".into(), Value::String("event".into()));
        result.insert("type".into(), Value::String(self.event_type.clone()));
        result.insert(
            "created_at".into(),
            self.created_at.clone().map_or(Value::Null, Value::String),
        );
        result.insert("data".into(), self.data.to_value());
        if let Some(api_version) = self.api_version.as_ref().filter(|v| !v.is_empty()) {
            result.insert("api_version".into(), Value::String(api_version.clone()));
        }
        result
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Event id={} type={}>", self.id, self.event_type)
    }
}

// Null is treated as absent; other scalars keep their JSON text.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
