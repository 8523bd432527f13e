//! Payment attempt types
//!
//! A payment attempt is the reconstructed view of one try at paying a payment
//! request, e.g. one card authorisation and its capture, or one open banking
//! payment initiation and its settlement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::{Currency, PaymentProcessor, PaymentRequestId};

/// Payment rails an attempt can be made on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodType {
    Card,
    /// Open banking payment initiation (bank transfer)
    Pisp,
}

impl PaymentMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodType::Card => "card",
            PaymentMethodType::Pisp => "pisp",
        }
    }
}

impl fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Furthest lifecycle point an attempt reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Initiated,
    Authorized,
    SettlementFailed,
    Settled,
    Refunded,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Initiated => "initiated",
            AttemptStatus::Authorized => "authorized",
            AttemptStatus::SettlementFailed => "settlement_failed",
            AttemptStatus::Settled => "settled",
            AttemptStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reconstructed payment attempt
///
/// Base fields come from the event that started the attempt. Milestone fields
/// are only populated when the corresponding event was observed with a
/// successful status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAttempt {
    /// Correlation key the attempt's events were grouped under
    pub attempt_key: String,

    /// Nil when no event able to start the attempt was seen
    pub payment_request_id: PaymentRequestId,

    pub initiated_at: Option<DateTime<Utc>>,

    pub payment_method: PaymentMethodType,

    pub currency: Currency,

    pub attempted_amount: Decimal,

    pub processor: PaymentProcessor,

    pub authorized_at: Option<DateTime<Utc>>,
    pub authorized_amount: Option<Decimal>,

    pub settled_at: Option<DateTime<Utc>>,
    pub settled_amount: Option<Decimal>,

    /// Card only, set by a successful void
    pub refunded_at: Option<DateTime<Utc>>,
    pub refunded_amount: Option<Decimal>,

    /// PISP only
    pub settlement_failed_at: Option<DateTime<Utc>>,

    /// PISP only, the bank the payment was initiated with
    pub institution_id: Option<String>,

    /// Card only
    pub wallet_name: Option<String>,
}

impl PaymentAttempt {
    /// Create an attempt with only its key and rail set
    pub fn new(attempt_key: impl Into<String>, payment_method: PaymentMethodType) -> Self {
        PaymentAttempt {
            attempt_key: attempt_key.into(),
            payment_request_id: PaymentRequestId::nil(),
            initiated_at: None,
            payment_method,
            currency: Currency::None,
            attempted_amount: Decimal::ZERO,
            processor: PaymentProcessor::None,
            authorized_at: None,
            authorized_amount: None,
            settled_at: None,
            settled_amount: None,
            refunded_at: None,
            refunded_amount: None,
            settlement_failed_at: None,
            institution_id: None,
            wallet_name: None,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized_at.is_some()
    }

    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }

    /// Furthest lifecycle point reached
    ///
    /// Refunds outrank settlement, settlement outranks a settlement failure,
    /// and any of those outrank a bare authorisation.
    pub fn status(&self) -> AttemptStatus {
        if self.refunded_at.is_some() {
            AttemptStatus::Refunded
        } else if self.settled_at.is_some() {
            AttemptStatus::Settled
        } else if self.settlement_failed_at.is_some() {
            AttemptStatus::SettlementFailed
        } else if self.authorized_at.is_some() {
            AttemptStatus::Authorized
        } else {
            AttemptStatus::Initiated
        }
    }
}
