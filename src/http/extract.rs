use crate::domain::payment::{ErrorEnvelope, ErrorPayload};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

/// JSON body extractor whose rejection carries the standard error envelope
/// instead of axum's plain-text default, so a malformed body and a failed
/// field validation look the same to clients.
pub struct AppJson<T>(pub T);

#[async_trait::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorEnvelope>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(validation_error(rejection.body_text())),
        }
    }
}

/// Path extractor with the same envelope-shaped rejection, for routes like
/// `/payments/:payment_id` where the segment must parse as a UUID.
pub struct AppPath<T>(pub T);

#[async_trait::async_trait]
impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorEnvelope>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(rejection) => Err(validation_error(rejection.body_text())),
        }
    }
}

pub fn validation_error(details: String) -> (StatusCode, Json<ErrorEnvelope>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorEnvelope {
            error: ErrorPayload {
                code: "VALIDATION_ERROR".to_string(),
                message: "invalid request".to_string(),
                details: Some(details),
            },
        }),
    )
}
