//! Card attempt reconstruction
//!
//! Card events are grouped by the processor's authorisation response ID. Within
//! a group the attempt is built in three phases:
//!
//! 1. **Authorisation**: the first `card_authorization` event, paired with the
//!    payer authentication setup that shares its card request ID. The setup
//!    event, when present, is what initiated the attempt.
//! 2. **Capture**: the first `card_sale`, or failing that the first
//!    `card_capture`. Starts the attempt if no authorisation was seen. A
//!    successful Checkout.com capture also authorises the attempt, since
//!    Checkout.com sends no separate authorisation confirmation.
//! 3. **Void**: the first `card_void`, which refunds the attempt.
//!
//! Every group yields an attempt, even one where no phase applied.

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::classification::{
    is_card_authorization_success, is_card_capture_success, is_card_void_success,
};
use crate::core::grouping::{group_by_correlation_key, start_attempt, EventGroup};
use crate::core::traits::AttemptGrouper;
use crate::types::{
    PaymentAttempt, PaymentMethodType, PaymentProcessor, PaymentRequestEvent,
    PaymentRequestEventType,
};

/// Event types that take part in card attempt reconstruction
pub const CARD_ATTEMPT_EVENT_TYPES: [PaymentRequestEventType; 5] = [
    PaymentRequestEventType::CardPayerAuthenticationSetup,
    PaymentRequestEventType::CardAuthorization,
    PaymentRequestEventType::CardSale,
    PaymentRequestEventType::CardCapture,
    PaymentRequestEventType::CardVoid,
];

/// Card rail attempt grouper
#[derive(Debug, Clone, Copy, Default)]
pub struct CardAttemptGrouper;

impl AttemptGrouper for CardAttemptGrouper {
    fn payment_method(&self) -> PaymentMethodType {
        PaymentMethodType::Card
    }

    /// Card events carry their own amounts, so `amount` is unused
    fn group(&self, events: &[PaymentRequestEvent], _amount: Decimal) -> Vec<PaymentAttempt> {
        group_by_correlation_key(events, PaymentMethodType::Card, &CARD_ATTEMPT_EVENT_TYPES)
            .iter()
            .map(build_card_attempt)
            .collect()
    }
}

fn build_card_attempt(group: &EventGroup<'_>) -> PaymentAttempt {
    let mut attempt: Option<PaymentAttempt> = None;

    if let Some(authorization) = group.first_of(PaymentRequestEventType::CardAuthorization) {
        let setup = group.events.iter().copied().find(|event| {
            event.event_type == PaymentRequestEventType::CardPayerAuthenticationSetup
                && event.card_request_id == authorization.card_request_id
        });
        let initial = setup.unwrap_or(authorization);

        let mut authorized = start_attempt(
            group.key,
            PaymentMethodType::Card,
            initial,
            authorization.amount,
        );
        if is_card_authorization_success(authorization) {
            authorized.authorized_at = Some(authorization.inserted_at);
            authorized.authorized_amount = Some(authorization.amount);
        }
        attempt = Some(authorized);
    }

    let capture = group
        .first_of(PaymentRequestEventType::CardSale)
        .or_else(|| group.first_of(PaymentRequestEventType::CardCapture));

    if let Some(capture) = capture {
        let captured = attempt.get_or_insert_with(|| {
            start_attempt(group.key, PaymentMethodType::Card, capture, capture.amount)
        });

        if is_card_capture_success(capture) {
            captured.settled_at = Some(capture.inserted_at);
            captured.settled_amount = Some(capture.amount);

            if capture.processor == PaymentProcessor::Checkout {
                captured.authorized_at = Some(capture.inserted_at);
                captured.authorized_amount = Some(capture.amount);
            }
        }
    }

    let mut attempt = attempt.unwrap_or_else(|| {
        debug!(
            attempt_key = group.key,
            "card attempt has no authorisation or capture event"
        );
        PaymentAttempt::new(group.key, PaymentMethodType::Card)
    });

    if let Some(void) = group.first_of(PaymentRequestEventType::CardVoid) {
        if is_card_void_success(void) {
            attempt.refunded_at = Some(void.inserted_at);
            attempt.refunded_amount = Some(void.amount);
        }
    }

    attempt.wallet_name = group
        .events
        .iter()
        .find_map(|event| event.wallet_name.clone());

    attempt
}
