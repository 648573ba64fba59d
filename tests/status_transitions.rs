use enrollment_payments::domain::payment::{EnrollmentStatus, PaymentStatus};
use enrollment_payments::domain::transitions::{plan_transition, TransitionOutcome};

const ALL_STATUSES: [PaymentStatus; 5] = [
    PaymentStatus::Pending,
    PaymentStatus::Succeeded,
    PaymentStatus::Failed,
    PaymentStatus::Canceled,
    PaymentStatus::Refunded,
];

#[test]
fn pending_to_succeeded_confirms_and_takes_a_seat() {
    let out = plan_transition(PaymentStatus::Pending, PaymentStatus::Succeeded);
    let TransitionOutcome::Applied(plan) = out else {
        panic!("expected applied transition, got {out:?}");
    };
    assert_eq!(plan.to, PaymentStatus::Succeeded);
    assert_eq!(plan.enrollment_status, EnrollmentStatus::Confirmed);
    assert!(plan.set_paid_at);
    assert!(plan.increment_capacity);
    assert!(!plan.set_refunded_at);
}

#[test]
fn pending_to_failed_cancels_enrollment_without_side_effects() {
    let TransitionOutcome::Applied(plan) =
        plan_transition(PaymentStatus::Pending, PaymentStatus::Failed)
    else {
        panic!("expected applied transition");
    };
    assert_eq!(plan.enrollment_status, EnrollmentStatus::Canceled);
    assert!(!plan.set_paid_at);
    assert!(!plan.set_refunded_at);
    assert!(!plan.increment_capacity);
}

#[test]
fn pending_to_canceled_cancels_enrollment_without_side_effects() {
    let TransitionOutcome::Applied(plan) =
        plan_transition(PaymentStatus::Pending, PaymentStatus::Canceled)
    else {
        panic!("expected applied transition");
    };
    assert_eq!(plan.enrollment_status, EnrollmentStatus::Canceled);
    assert!(!plan.increment_capacity);
}

#[test]
fn succeeded_to_refunded_sets_refund_timestamp_only() {
    let TransitionOutcome::Applied(plan) =
        plan_transition(PaymentStatus::Succeeded, PaymentStatus::Refunded)
    else {
        panic!("expected applied transition");
    };
    assert_eq!(plan.enrollment_status, EnrollmentStatus::Canceled);
    assert!(plan.set_refunded_at);
    assert!(!plan.set_paid_at);
    assert!(!plan.increment_capacity);
}

#[test]
fn reapplying_the_same_target_is_a_no_op() {
    for status in ALL_STATUSES {
        assert_eq!(plan_transition(status, status), TransitionOutcome::NoOp);
    }
}

#[test]
fn duplicate_succeeded_event_plans_a_single_seat_increment() {
    let first = plan_transition(PaymentStatus::Pending, PaymentStatus::Succeeded);
    assert!(matches!(first, TransitionOutcome::Applied(p) if p.increment_capacity));

    // Once the record is SUCCEEDED, a redelivered succeeded event must not
    // plan another increment.
    let second = plan_transition(PaymentStatus::Succeeded, PaymentStatus::Succeeded);
    assert_eq!(second, TransitionOutcome::NoOp);
}

#[test]
fn status_never_moves_backward() {
    for current in ALL_STATUSES {
        if current == PaymentStatus::Pending {
            continue;
        }
        assert_eq!(
            plan_transition(current, PaymentStatus::Pending),
            TransitionOutcome::NoOp,
            "{current:?} must not return to PENDING"
        );
    }
}

#[test]
fn refunded_is_reachable_only_from_succeeded() {
    for current in ALL_STATUSES {
        let out = plan_transition(current, PaymentStatus::Refunded);
        if current == PaymentStatus::Succeeded {
            assert!(matches!(out, TransitionOutcome::Applied(_)));
        } else {
            assert_eq!(out, TransitionOutcome::NoOp, "{current:?} -> REFUNDED must be rejected");
        }
    }
}

#[test]
fn terminal_statuses_ignore_every_settlement_event() {
    for current in [PaymentStatus::Failed, PaymentStatus::Canceled, PaymentStatus::Refunded] {
        for target in ALL_STATUSES {
            assert_eq!(
                plan_transition(current, target),
                TransitionOutcome::NoOp,
                "{current:?} -> {target:?} must be a no-op"
            );
        }
    }
}

#[test]
fn status_strings_round_trip() {
    for status in ALL_STATUSES {
        assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(PaymentStatus::parse("succeeded"), None);
}
