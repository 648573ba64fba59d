use axum::body::Body;
use axum::extract::FromRequest;
use axum::http::{header, Request, StatusCode};
use enrollment_payments::domain::payment::{ConfirmPaymentRequest, CreateIntentRequest};
use enrollment_payments::http::extract::AppJson;

fn json_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/payments/confirm-payment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn malformed_json_body_gets_the_error_envelope() {
    let req = json_request("{not json");
    let result = AppJson::<ConfirmPaymentRequest>::from_request(req, &()).await;

    let (status, body) = result.err().unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.0.error.code, "VALIDATION_ERROR");
    assert!(body.0.error.details.is_some());
}

#[tokio::test]
async fn missing_required_field_gets_the_error_envelope() {
    let req = json_request(r#"{"wrongField": "pi_123"}"#);
    let result = AppJson::<ConfirmPaymentRequest>::from_request(req, &()).await;

    let (status, body) = result.err().unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.0.error.code, "VALIDATION_ERROR");
    let details = body.0.error.details.unwrap();
    assert!(details.contains("paymentIntentId"), "details were: {details}");
}

#[tokio::test]
async fn missing_content_type_gets_the_error_envelope() {
    let req = Request::builder()
        .method("POST")
        .uri("/payments/confirm-payment")
        .body(Body::from(r#"{"paymentIntentId": "pi_123"}"#))
        .unwrap();
    let result = AppJson::<ConfirmPaymentRequest>::from_request(req, &()).await;

    let (status, body) = result.err().unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.0.error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn well_formed_body_still_parses() {
    let req = json_request(r#"{"paymentIntentId": "pi_123"}"#);
    let AppJson(parsed) = AppJson::<ConfirmPaymentRequest>::from_request(req, &())
        .await
        .ok()
        .unwrap();
    assert_eq!(parsed.payment_intent_id, "pi_123");
}

#[tokio::test]
async fn nested_customer_validation_reports_the_field() {
    let body = r#"{
        "courseId": "1f1e8f64-9f2a-4a7e-b1c5-000000000000",
        "customer": {"email": "learner@example.ch"}
    }"#;
    let req = json_request(body);
    let result = AppJson::<CreateIntentRequest>::from_request(req, &()).await;

    let (status, body) = result.err().unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.0.error.code, "VALIDATION_ERROR");
    assert!(body.0.error.details.unwrap().contains("name"));
}
