//! Core traits for attempt reconstruction
//!
//! Each payment rail reconstructs attempts from its own event types and
//! correlation key. The `AttemptGrouper` trait is the seam the reconstructor
//! composes rails through, so a new rail is added by registering another
//! grouper rather than changing the existing ones.

use rust_decimal::Decimal;

use crate::types::{PaymentAttempt, PaymentMethodType, PaymentRequestEvent};

/// Reconstructs the payment attempts of one payment rail
///
/// Implementations must be pure: the same events and amount always produce the
/// same attempts, and no error is ever raised for incomplete event logs.
pub trait AttemptGrouper: Send + Sync {
    /// The rail whose attempts this grouper produces
    fn payment_method(&self) -> PaymentMethodType;

    /// Reconstruct attempts from a payment request's events
    ///
    /// `amount` is the payment request's total amount, for rails whose events
    /// don't carry the attempted amount themselves.
    fn group(&self, events: &[PaymentRequestEvent], amount: Decimal) -> Vec<PaymentAttempt>;
}
