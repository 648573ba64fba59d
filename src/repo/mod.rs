use crate::domain::course::Course;
use crate::domain::transitions::AppliedTransition;
use uuid::Uuid;

pub mod courses_repo;
pub mod payments_repo;

use payments_repo::{NewPayment, PaymentRecord};

/// Result of one attempted status move. `seated` is present only when the
/// plan called for a seat increment and the move was applied; `Some(false)`
/// means the course was already full when the payment settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionReceipt {
    pub applied: bool,
    pub seated: Option<bool>,
}

#[async_trait::async_trait]
pub trait CourseStore: Send + Sync {
    async fn find_by_id(&self, course_id: Uuid) -> anyhow::Result<Option<Course>>;
}

#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, data: &NewPayment) -> anyhow::Result<()>;

    async fn find_by_intent_id(&self, intent_id: &str) -> anyhow::Result<Option<PaymentRecord>>;

    async fn find_by_id(&self, payment_id: Uuid) -> anyhow::Result<Option<PaymentRecord>>;

    /// Apply a planned status move and, when the plan takes a seat, the
    /// course capacity increment. Both changes land as one atomic unit or
    /// not at all; a half-applied transition would strand a settled payment
    /// without its seat, because redelivered events hit the no-op arm.
    async fn apply_transition(
        &self,
        intent_id: &str,
        course_id: Uuid,
        plan: &AppliedTransition,
    ) -> anyhow::Result<TransitionReceipt>;
}
