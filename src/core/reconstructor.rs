//! Payment attempt reconstruction
//!
//! The `AttemptReconstructor` runs every registered rail grouper over a payment
//! request's events and concatenates their attempts, card attempts first.
//!
//! Reconstruction is best effort: event logs from webhooks are neither
//! guaranteed complete nor ordered, so missing or contradictory events produce
//! partially populated attempts rather than errors.

use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::card::CardAttemptGrouper;
use crate::core::pisp::PispAttemptGrouper;
use crate::core::traits::AttemptGrouper;
use crate::types::{PaymentAttempt, PaymentRequestEvent};

/// Reconstructs payment attempts across payment rails
///
/// The reconstructor holds no mutable state and is `Send + Sync`, so one
/// instance can be shared across threads reconstructing independent payment
/// requests.
///
/// # Examples
///
/// ```
/// use moneymoov_attempts::AttemptReconstructor;
/// use rust_decimal::Decimal;
///
/// let reconstructor = AttemptReconstructor::new();
/// let attempts = reconstructor.reconstruct(&[], Decimal::new(1000, 2));
/// assert!(attempts.is_empty());
/// ```
pub struct AttemptReconstructor {
    groupers: Vec<Box<dyn AttemptGrouper>>,
}

impl AttemptReconstructor {
    /// Create a reconstructor for the card and PISP rails
    pub fn new() -> Self {
        Self::empty()
            .with_grouper(CardAttemptGrouper)
            .with_grouper(PispAttemptGrouper)
    }

    /// Create a reconstructor with no rails registered
    pub fn empty() -> Self {
        Self {
            groupers: Vec::new(),
        }
    }

    /// Register another rail; its attempts follow those of earlier rails
    pub fn with_grouper(mut self, grouper: impl AttemptGrouper + 'static) -> Self {
        self.groupers.push(Box::new(grouper));
        self
    }

    /// Reconstruct the attempts of one payment request
    ///
    /// # Arguments
    ///
    /// * `events` - The payment request's events, in any order
    /// * `amount` - The payment request's total amount
    ///
    /// # Returns
    ///
    /// The attempts of each registered rail, concatenated in registration order.
    /// Empty input yields an empty result.
    pub fn reconstruct(&self, events: &[PaymentRequestEvent], amount: Decimal) -> Vec<PaymentAttempt> {
        if events.is_empty() {
            return Vec::new();
        }

        let mut attempts = Vec::new();
        for grouper in &self.groupers {
            let rail_attempts = grouper.group(events, amount);
            debug!(
                rail = %grouper.payment_method(),
                attempts = rail_attempts.len(),
                "reconstructed rail attempts"
            );
            attempts.extend(rail_attempts);
        }

        attempts
    }
}

impl Default for AttemptReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AttemptReconstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptReconstructor")
            .field(
                "rails",
                &self
                    .groupers
                    .iter()
                    .map(|grouper| grouper.payment_method())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Reconstruct all card and PISP attempts of a payment request
pub fn get_payment_attempts(events: &[PaymentRequestEvent], amount: Decimal) -> Vec<PaymentAttempt> {
    AttemptReconstructor::new().reconstruct(events, amount)
}

/// Reconstruct the card attempts of a payment request
pub fn get_card_payment_attempts(events: &[PaymentRequestEvent]) -> Vec<PaymentAttempt> {
    CardAttemptGrouper.group(events, Decimal::ZERO)
}

/// Reconstruct the PISP attempts of a payment request
pub fn get_pisp_payment_attempts(
    events: &[PaymentRequestEvent],
    amount: Decimal,
) -> Vec<PaymentAttempt> {
    PispAttemptGrouper.group(events, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::status::{card, pisp};
    use crate::types::{PaymentMethodType, PaymentProcessor, PaymentRequestEventType};
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    fn at(offset_secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::seconds(offset_secs)
    }

    fn mixed_events() -> Vec<PaymentRequestEvent> {
        let request = Uuid::from_u128(3);

        let mut pisp_initiate =
            PaymentRequestEvent::new(request, PaymentRequestEventType::PispInitiate, at(0), Decimal::ZERO);
        pisp_initiate.pisp_payment_initiation_id = Some("init-1".to_string());
        pisp_initiate.processor = PaymentProcessor::Plaid;

        let mut pisp_callback =
            PaymentRequestEvent::new(request, PaymentRequestEventType::PispCallback, at(5), Decimal::ONE);
        pisp_callback.pisp_payment_initiation_id = Some("init-1".to_string());
        pisp_callback.processor = PaymentProcessor::Plaid;
        pisp_callback.status = Some(pisp::PLAID_INITIATED.to_string());

        let mut card_authorization = PaymentRequestEvent::new(
            request,
            PaymentRequestEventType::CardAuthorization,
            at(10),
            Decimal::TEN,
        );
        card_authorization.card_authorization_response_id = Some("auth-1".to_string());
        card_authorization.status = Some(card::AUTHORIZED_SUCCESS.to_string());

        vec![pisp_initiate, pisp_callback, card_authorization]
    }

    /// A rail that reports one attempt per call, to observe composition
    #[derive(Debug)]
    struct FixedGrouper;

    impl AttemptGrouper for FixedGrouper {
        fn payment_method(&self) -> PaymentMethodType {
            PaymentMethodType::Card
        }

        fn group(&self, _events: &[PaymentRequestEvent], _amount: Decimal) -> Vec<PaymentAttempt> {
            vec![PaymentAttempt::new("fixed", PaymentMethodType::Card)]
        }
    }

    #[test]
    fn test_empty_input_yields_no_attempts() {
        assert!(get_payment_attempts(&[], Decimal::TEN).is_empty());
        assert!(AttemptReconstructor::new()
            .with_grouper(FixedGrouper)
            .reconstruct(&[], Decimal::TEN)
            .is_empty());
    }

    #[test]
    fn test_card_attempts_precede_pisp_attempts() {
        let attempts = get_payment_attempts(&mixed_events(), Decimal::new(5000, 2));

        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].payment_method, PaymentMethodType::Card);
        assert_eq!(attempts[0].attempt_key, "auth-1");
        assert_eq!(attempts[1].payment_method, PaymentMethodType::Pisp);
        assert_eq!(attempts[1].attempted_amount, Decimal::new(5000, 2));
        assert_eq!(attempts[1].authorized_at, Some(at(5)));
    }

    #[test]
    fn test_rail_helpers_match_reconstructor() {
        let events = mixed_events();
        let mut expected = get_card_payment_attempts(&events);
        expected.extend(get_pisp_payment_attempts(&events, Decimal::ONE));

        assert_eq!(get_payment_attempts(&events, Decimal::ONE), expected);
    }

    #[test]
    fn test_additional_rail_is_appended() {
        let reconstructor = AttemptReconstructor::new().with_grouper(FixedGrouper);

        let attempts = reconstructor.reconstruct(&mixed_events(), Decimal::ONE);

        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[2].attempt_key, "fixed");
    }

    #[test]
    fn test_empty_reconstructor_yields_nothing() {
        assert!(AttemptReconstructor::empty()
            .reconstruct(&mixed_events(), Decimal::ONE)
            .is_empty());
    }

    #[test]
    fn test_reconstructor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AttemptReconstructor>();
    }

    #[test]
    fn test_debug_lists_rails() {
        let debug = format!("{:?}", AttemptReconstructor::new());
        assert_eq!(debug, "AttemptReconstructor { rails: [Card, Pisp] }");
    }
}
