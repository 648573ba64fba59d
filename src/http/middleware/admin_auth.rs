use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Guards the back-office routes (payment listing, stats, refunds) with the
/// shared internal API key.
pub async fn require_internal_api_key(
    State(expected): State<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get("X-Internal-Api-Key")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if provided != expected {
        tracing::warn!(path = %request.uri().path(), "rejected admin request without valid api key");
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": {"code": "UNAUTHORIZED", "message": "missing or invalid internal api key"}})),
        )
            .into_response();
    }

    next.run(request).await
}
