use enrollment_payments::domain::payment::PaymentStatus;
use enrollment_payments::webhook::event::GatewayEvent;

fn event(event_type: &str, object: serde_json::Value) -> GatewayEvent {
    serde_json::from_value(serde_json::json!({
        "id": "evt_test",
        "type": event_type,
        "data": { "object": object }
    }))
    .unwrap()
}

#[test]
fn succeeded_event_targets_succeeded() {
    let evt = event("payment_intent.succeeded", serde_json::json!({"id": "pi_123"}));
    assert_eq!(evt.target_status(), Some(PaymentStatus::Succeeded));
    assert_eq!(evt.intent_id(), Some("pi_123"));
}

#[test]
fn payment_failed_event_targets_failed() {
    let evt = event("payment_intent.payment_failed", serde_json::json!({"id": "pi_123"}));
    assert_eq!(evt.target_status(), Some(PaymentStatus::Failed));
}

#[test]
fn canceled_event_targets_canceled() {
    let evt = event("payment_intent.canceled", serde_json::json!({"id": "pi_123"}));
    assert_eq!(evt.target_status(), Some(PaymentStatus::Canceled));
}

#[test]
fn untracked_event_types_map_to_nothing() {
    for event_type in ["charge.succeeded", "customer.created", "payout.paid", ""] {
        let evt = event(event_type, serde_json::json!({"id": "x"}));
        assert_eq!(evt.target_status(), None, "{event_type} should be ignored");
    }
}

#[test]
fn missing_intent_id_is_detected() {
    let evt = event("payment_intent.succeeded", serde_json::json!({"amount": 100}));
    assert_eq!(evt.intent_id(), None);
}

#[test]
fn parses_a_realistic_gateway_envelope() {
    let raw = br#"{
        "id": "evt_3Nq",
        "object": "event",
        "api_version": "2023-10-16",
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": "pi_3Nq",
                "object": "payment_intent",
                "amount": 9999,
                "currency": "chf",
                "status": "succeeded"
            }
        }
    }"#;

    let evt: GatewayEvent = serde_json::from_slice(raw).unwrap();
    assert_eq!(evt.id, "evt_3Nq");
    assert_eq!(evt.intent_id(), Some("pi_3Nq"));
    assert_eq!(evt.target_status(), Some(PaymentStatus::Succeeded));
}
