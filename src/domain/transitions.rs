use crate::domain::payment::{EnrollmentStatus, PaymentStatus};

/// One permitted move through the payment state machine, with the side
/// effects persistence has to apply alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedTransition {
    pub from: PaymentStatus,
    pub to: PaymentStatus,
    pub enrollment_status: EnrollmentStatus,
    pub set_paid_at: bool,
    pub set_refunded_at: bool,
    pub increment_capacity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(AppliedTransition),
    /// The requested move is not in the table. Duplicate and out-of-order
    /// webhook deliveries land here; the caller leaves the record untouched.
    NoOp,
}

/// Decide what a target status means given the current one. Statuses only
/// move forward: `PENDING` fans out to the three settlement outcomes, and
/// `REFUNDED` is reachable solely from `SUCCEEDED`.
pub fn plan_transition(current: PaymentStatus, target: PaymentStatus) -> TransitionOutcome {
    use PaymentStatus::*;

    match (current, target) {
        (Pending, Succeeded) => TransitionOutcome::Applied(AppliedTransition {
            from: Pending,
            to: Succeeded,
            enrollment_status: EnrollmentStatus::Confirmed,
            set_paid_at: true,
            set_refunded_at: false,
            increment_capacity: true,
        }),
        (Pending, Failed) => TransitionOutcome::Applied(AppliedTransition {
            from: Pending,
            to: Failed,
            enrollment_status: EnrollmentStatus::Canceled,
            set_paid_at: false,
            set_refunded_at: false,
            increment_capacity: false,
        }),
        (Pending, Canceled) => TransitionOutcome::Applied(AppliedTransition {
            from: Pending,
            to: Canceled,
            enrollment_status: EnrollmentStatus::Canceled,
            set_paid_at: false,
            set_refunded_at: false,
            increment_capacity: false,
        }),
        (Succeeded, Refunded) => TransitionOutcome::Applied(AppliedTransition {
            from: Succeeded,
            to: Refunded,
            enrollment_status: EnrollmentStatus::Canceled,
            set_paid_at: false,
            set_refunded_at: true,
            increment_capacity: false,
        }),
        _ => TransitionOutcome::NoOp,
    }
}
