use crate::domain::payment::{ConfirmPaymentRequest, CreateIntentRequest};
use crate::http::extract::{AppJson, AppPath};
use crate::repo::payments_repo::PaymentListFilter;
use crate::repo::PaymentStore;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

pub async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(req): AppJson<CreateIntentRequest>,
) -> impl IntoResponse {
    match state.enrollment_service.request_enrollment(req, headers).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    AppJson(req): AppJson<ConfirmPaymentRequest>,
) -> impl IntoResponse {
    match state.enrollment_service.confirm_enrollment(req).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn refund_payment(
    State(state): State<AppState>,
    AppPath(payment_id): AppPath<Uuid>,
) -> impl IntoResponse {
    match state.enrollment_service.refund_enrollment(payment_id).await {
        Ok(view) => (axum::http::StatusCode::OK, Json(view)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn get_payment(
    State(state): State<AppState>,
    AppPath(payment_id): AppPath<Uuid>,
) -> impl IntoResponse {
    match state.payments_repo.find_by_id(payment_id).await {
        Ok(Some(record)) => (axum::http::StatusCode::OK, Json(record)).into_response(),
        Ok(None) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "payment not found"})),
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub status: Option<String>,
    pub course_id: Option<Uuid>,
    pub email: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> impl IntoResponse {
    let filter = PaymentListFilter {
        status: query.status,
        course_id: query.course_id,
        email: query.email,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    match state.payments_repo.list(&filter).await {
        Ok((payments, total)) => (
            axum::http::StatusCode::OK,
            Json(serde_json::json!({
                "payments": payments,
                "total": total,
                "page": filter.page.max(1),
                "per_page": filter.per_page.clamp(1, 100),
            })),
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

pub async fn stats_overview(State(state): State<AppState>) -> impl IntoResponse {
    let by_status = match state.payments_repo.totals_by_status().await {
        Ok(v) => v,
        Err(e) => {
            return (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };
    let by_course = match state.payments_repo.totals_by_course().await {
        Ok(v) => v,
        Err(e) => {
            return (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    let total_revenue_minor: i64 = by_status
        .iter()
        .filter(|t| t.status == "SUCCEEDED")
        .map(|t| t.revenue_minor)
        .sum();

    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({
            "total_revenue_minor": total_revenue_minor,
            "by_status": by_status,
            "by_course": by_course,
        })),
    )
        .into_response()
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}
