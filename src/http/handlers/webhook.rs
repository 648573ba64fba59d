use crate::webhook::event::GatewayEvent;
use crate::webhook::signature::verify_signature;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

/// Gateway webhook endpoint. Takes the raw body (no JSON middleware runs
/// ahead of this route), verifies the signature before anything is parsed,
/// and acknowledges with 200 once an event is accepted, including no-op
/// transitions and event types we do not track. Only a bad signature earns a
/// 400; storage failures return 500 so the gateway redelivers.
pub async fn handle_gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature_header = headers
        .get("stripe-signature")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    let now_unix = chrono::Utc::now().timestamp();

    if let Err(e) = verify_signature(
        &body,
        signature_header,
        &state.webhook_signing_secret,
        state.webhook_tolerance_seconds,
        now_unix,
    ) {
        tracing::warn!(error = %e, "rejected webhook with invalid signature");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "invalid signature"})),
        )
            .into_response();
    }

    let event: GatewayEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            // Authenticated but unparseable. Acknowledge so the gateway does
            // not keep redelivering a payload we will never understand.
            tracing::warn!(error = %e, "ignoring unparseable webhook payload");
            return accepted();
        }
    };

    let Some(target) = event.target_status() else {
        tracing::info!(event_id = %event.id, event_type = %event.event_type, "ignoring untracked event type");
        return accepted();
    };
    let Some(intent_id) = event.intent_id() else {
        tracing::warn!(event_id = %event.id, event_type = %event.event_type, "event object carries no intent id");
        return accepted();
    };

    match state.enrollment_service.transition_by_intent(intent_id, target).await {
        Ok(Some(_)) => accepted(),
        Ok(None) => {
            tracing::warn!(event_id = %event.id, intent_id, "webhook for unknown intent");
            accepted()
        }
        Err(e) => {
            tracing::error!(event_id = %event.id, intent_id, error = %e, "webhook processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "event processing failed"})),
            )
                .into_response()
        }
    }
}

fn accepted() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({"received": true}))).into_response()
}
