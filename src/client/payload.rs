use crate::JsonObject;
use serde::Serialize;

/// Body sent to the webhook-service, over HTTP or through the queue
///
/// ```json
/// {"event_type": "payment_intent.succeeded", "name": "payment_intent.succeeded", "data": {"object": {...}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPayload {
    pub event_type: String,
    /// Human-readable name, defaults to the event type
    pub name: String,
    pub data: JsonObject,
}

impl DeliveryPayload {
    pub fn new(event_type: impl Into<String>, data: JsonObject, name: Option<String>) -> Self {
        let event_type = event_type.into();
        Self {
            name: name.unwrap_or_else(|| event_type.clone()),
            event_type,
            data,
        }
    }
}
