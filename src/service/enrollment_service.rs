use crate::domain::payment::{
    ConfirmPaymentRequest, ConfirmPaymentResponse, CourseSummary, CreateIntentRequest,
    CreateIntentResponse, ErrorEnvelope, ErrorPayload, PaymentStatus, PaymentView,
};
use crate::domain::transitions::{plan_transition, TransitionOutcome};
use crate::gateways::{GatewayError, IntentStatus, PaymentGateway};
use crate::repo::payments_repo::{NewPayment, PaymentRecord};
use crate::repo::{CourseStore, PaymentStore};
use axum::http::HeaderMap;
use axum::http::StatusCode;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct EnrollmentService {
    pub courses_repo: Arc<dyn CourseStore>,
    pub payments_repo: Arc<dyn PaymentStore>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl EnrollmentService {
    /// Intent-creation path: availability is checked before any gateway call,
    /// the gateway intent is created, then the local record lands as PENDING.
    pub async fn request_enrollment(
        &self,
        req: CreateIntentRequest,
        headers: HeaderMap,
    ) -> Result<CreateIntentResponse, (StatusCode, ErrorEnvelope)> {
        validate_request(&req)?;

        let course = self
            .courses_repo
            .find_by_id(req.course_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                (
                    StatusCode::NOT_FOUND,
                    err("COURSE_NOT_FOUND", "no course with that id"),
                )
            })?;

        if !course.is_available() {
            let reason = if course.is_active {
                "course is fully booked"
            } else {
                "course is not open for enrollment"
            };
            return Err((StatusCode::BAD_REQUEST, err("COURSE_UNAVAILABLE", reason)));
        }

        let amount_minor = course.charge_amount_minor();
        let client_ip = headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let user_agent = headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let metadata = serde_json::json!({
            "source": "enrollment",
            "course_id": course.course_id,
            "customer_email": req.customer.email,
            "client_ip": client_ip,
            "user_agent": user_agent,
            "enrollment": req.enrollment,
        });

        let handle = self
            .gateway
            .create_intent(amount_minor, &course.currency, &metadata)
            .await
            .map_err(|e| gateway_error("create_intent", None, e))?;

        let payment = NewPayment {
            payment_id: Uuid::new_v4(),
            gateway_intent_id: handle.intent_id.clone(),
            course_id: course.course_id,
            customer: req.customer,
            amount_minor,
            currency: course.currency.clone(),
            metadata,
        };
        self.payments_repo.insert(&payment).await.map_err(internal)?;

        tracing::info!(
            intent_id = %handle.intent_id,
            course_id = %course.course_id,
            amount_minor,
            "payment intent created"
        );

        Ok(CreateIntentResponse {
            client_secret: handle.client_secret,
            payment_intent_id: handle.intent_id,
            amount: amount_minor,
            currency: course.currency,
            course: CourseSummary {
                id: course.course_id,
                title: course.title,
            },
        })
    }

    /// Client-initiated poll: read the gateway's view of the intent and fold
    /// it into the local record through the same idempotent transition the
    /// webhook path uses.
    pub async fn confirm_enrollment(
        &self,
        req: ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse, (StatusCode, ErrorEnvelope)> {
        let intent_id = req.payment_intent_id.as_str();
        let record = self
            .payments_repo
            .find_by_intent_id(intent_id)
            .await
            .map_err(internal)?
            .ok_or_else(payment_not_found)?;

        let snapshot = self
            .gateway
            .retrieve_intent(intent_id)
            .await
            .map_err(|e| gateway_error("retrieve_intent", Some(intent_id), e))?;

        // Settlement failures never show up on a retrieved intent; they only
        // arrive as payment_failed webhook events.
        let target = match snapshot.status {
            IntentStatus::Succeeded => Some(PaymentStatus::Succeeded),
            IntentStatus::Canceled => Some(PaymentStatus::Canceled),
            IntentStatus::Processing | IntentStatus::RequiresPayment => None,
        };

        let record = match target {
            Some(target) => self
                .transition_by_intent(intent_id, target)
                .await
                .map_err(internal)?
                .ok_or_else(payment_not_found)?,
            None => record,
        };

        Ok(ConfirmPaymentResponse {
            payment: record.to_view(),
            gateway_status: snapshot.status.as_str().to_string(),
        })
    }

    /// Admin-triggered refund: only a succeeded payment can move, and the
    /// gateway call happens before the local transition.
    pub async fn refund_enrollment(
        &self,
        payment_id: Uuid,
    ) -> Result<PaymentView, (StatusCode, ErrorEnvelope)> {
        let record = self
            .payments_repo
            .find_by_id(payment_id)
            .await
            .map_err(internal)?
            .ok_or_else(payment_not_found)?;

        if record.status != PaymentStatus::Succeeded.as_str() {
            return Err((
                StatusCode::BAD_REQUEST,
                err("INVALID_TRANSITION", "only succeeded payments can be refunded"),
            ));
        }

        let intent_id = record.gateway_intent_id.clone();
        self.gateway
            .refund_intent(&intent_id)
            .await
            .map_err(|e| gateway_error("refund_intent", Some(&intent_id), e))?;

        let record = self
            .transition_by_intent(&intent_id, PaymentStatus::Refunded)
            .await
            .map_err(internal)?
            .ok_or_else(payment_not_found)?;

        Ok(record.to_view())
    }

    /// The single convergence point for every status change. Plans the move
    /// with the pure transition table and hands the plan to the store, which
    /// applies the compare-and-set and any seat increment as one atomic
    /// write. Returns `None` when no payment carries the intent id.
    pub async fn transition_by_intent(
        &self,
        intent_id: &str,
        target: PaymentStatus,
    ) -> anyhow::Result<Option<PaymentRecord>> {
        let Some(record) = self.payments_repo.find_by_intent_id(intent_id).await? else {
            return Ok(None);
        };
        let current = PaymentStatus::parse(&record.status)
            .ok_or_else(|| anyhow::anyhow!("stored payment has unknown status {}", record.status))?;

        match plan_transition(current, target) {
            TransitionOutcome::NoOp => {
                tracing::info!(
                    intent_id,
                    current = current.as_str(),
                    target = target.as_str(),
                    "duplicate or out-of-order event, leaving payment unchanged"
                );
            }
            TransitionOutcome::Applied(plan) => {
                let receipt = self
                    .payments_repo
                    .apply_transition(intent_id, record.course_id, &plan)
                    .await?;
                if receipt.applied {
                    tracing::info!(
                        intent_id,
                        from = plan.from.as_str(),
                        to = plan.to.as_str(),
                        "payment transitioned"
                    );
                    if plan.increment_capacity && receipt.seated == Some(false) {
                        tracing::warn!(
                            intent_id,
                            course_id = %record.course_id,
                            "payment settled for a full course; manual correction required"
                        );
                    }
                } else {
                    tracing::info!(intent_id, "transition already applied by a concurrent writer");
                }
            }
        }

        self.payments_repo.find_by_intent_id(intent_id).await
    }
}

fn validate_request(req: &CreateIntentRequest) -> Result<(), (StatusCode, ErrorEnvelope)> {
    if req.customer.name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            err_detail("VALIDATION_ERROR", "invalid request body", "customer.name must not be empty"),
        ));
    }
    let email = req.customer.email.as_str();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err((
            StatusCode::BAD_REQUEST,
            err_detail("VALIDATION_ERROR", "invalid request body", "customer.email must be a valid email address"),
        ));
    }
    Ok(())
}

fn gateway_error(op: &str, intent_id: Option<&str>, e: GatewayError) -> (StatusCode, ErrorEnvelope) {
    tracing::error!(op, intent_id, error = %e, "gateway call failed");
    match e {
        GatewayError::Unavailable(_) | GatewayError::Decode(_) => (
            StatusCode::BAD_GATEWAY,
            err("GATEWAY_UNAVAILABLE", "payment gateway is unavailable, retry later"),
        ),
        GatewayError::InvalidRequest(msg) => (
            StatusCode::BAD_REQUEST,
            err_detail("GATEWAY_REJECTED", "payment gateway rejected the request", &msg),
        ),
        GatewayError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            err("PAYMENT_NOT_FOUND", "gateway has no record of that intent"),
        ),
    }
}

fn payment_not_found() -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::NOT_FOUND,
        err("PAYMENT_NOT_FOUND", "no payment with that identifier"),
    )
}

fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

fn err_detail(code: &str, message: &str, details: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: Some(details.to_string()),
        },
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        err("INTERNAL_ERROR", &e.to_string()),
    )
}
