use crate::domain::payment::PaymentStatus;
use serde::Deserialize;

/// Gateway event envelope: `{ id, type, data: { object } }`. The object is
/// left as raw JSON until the event type tells us what to expect in it.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

impl GatewayEvent {
    /// The local status an event type maps to; `None` for event types the
    /// workflow does not track.
    pub fn target_status(&self) -> Option<PaymentStatus> {
        match self.event_type.as_str() {
            "payment_intent.succeeded" => Some(PaymentStatus::Succeeded),
            "payment_intent.payment_failed" => Some(PaymentStatus::Failed),
            "payment_intent.canceled" => Some(PaymentStatus::Canceled),
            _ => None,
        }
    }

    pub fn intent_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|id| id.as_str())
    }
}
