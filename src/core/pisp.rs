//! PISP (open banking payment initiation) attempt reconstruction
//!
//! PISP events are grouped by payment initiation ID. PISP events don't carry
//! the amount the payer was asked for, so the caller passes the payment
//! request's total amount, which becomes every attempt's attempted amount.
//!
//! A group only yields an attempt if it has an anchor event to start it from:
//! the first initiate, else callback, else webhook, else settle event. A group
//! holding nothing but settlement failures is dropped.

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::classification::is_pisp_authorization;
use crate::core::grouping::{group_by_correlation_key, start_attempt, EventGroup};
use crate::core::traits::AttemptGrouper;
use crate::types::{PaymentAttempt, PaymentMethodType, PaymentRequestEvent, PaymentRequestEventType};

/// Event types that take part in PISP attempt reconstruction
pub const PISP_ATTEMPT_EVENT_TYPES: [PaymentRequestEventType; 5] = [
    PaymentRequestEventType::PispInitiate,
    PaymentRequestEventType::PispCallback,
    PaymentRequestEventType::PispWebhook,
    PaymentRequestEventType::PispSettle,
    PaymentRequestEventType::PispSettleFailure,
];

/// Event types an attempt can be started from, in order of preference
const ANCHOR_PRIORITY: [PaymentRequestEventType; 4] = [
    PaymentRequestEventType::PispInitiate,
    PaymentRequestEventType::PispCallback,
    PaymentRequestEventType::PispWebhook,
    PaymentRequestEventType::PispSettle,
];

/// Event types that can authorise an attempt
const AUTHORIZATION_EVENT_TYPES: [PaymentRequestEventType; 2] = [
    PaymentRequestEventType::PispCallback,
    PaymentRequestEventType::PispWebhook,
];

/// PISP rail attempt grouper
#[derive(Debug, Clone, Copy, Default)]
pub struct PispAttemptGrouper;

impl AttemptGrouper for PispAttemptGrouper {
    fn payment_method(&self) -> PaymentMethodType {
        PaymentMethodType::Pisp
    }

    fn group(&self, events: &[PaymentRequestEvent], amount: Decimal) -> Vec<PaymentAttempt> {
        group_by_correlation_key(events, PaymentMethodType::Pisp, &PISP_ATTEMPT_EVENT_TYPES)
            .iter()
            .filter_map(|group| build_pisp_attempt(group, amount))
            .collect()
    }
}

fn build_pisp_attempt(group: &EventGroup<'_>, amount: Decimal) -> Option<PaymentAttempt> {
    let Some(anchor) = ANCHOR_PRIORITY
        .iter()
        .find_map(|event_type| group.first_of(*event_type))
    else {
        debug!(
            attempt_key = group.key,
            "skipping PISP attempt without an initiate, callback, webhook or settle event"
        );
        return None;
    };

    let mut attempt = start_attempt(group.key, PaymentMethodType::Pisp, anchor, amount);
    attempt.institution_id = anchor.pisp_payment_service_provider_id.clone();

    if let Some(authorization) = group
        .of_types(&AUTHORIZATION_EVENT_TYPES)
        .find(|event| is_pisp_authorization(event))
    {
        attempt.authorized_at = Some(authorization.inserted_at);
        attempt.authorized_amount = Some(authorization.amount);
    }

    if let Some(settle) = group.first_of(PaymentRequestEventType::PispSettle) {
        attempt.settled_at = Some(settle.inserted_at);
        attempt.settled_amount = Some(settle.amount);
    } else if let Some(failure) = group.first_of(PaymentRequestEventType::PispSettleFailure) {
        attempt.settlement_failed_at = Some(failure.inserted_at);
    }

    Some(attempt)
}
