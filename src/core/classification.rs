//! Success classification tables
//!
//! Whether an event moves an attempt to a milestone depends only on the
//! event's processor and status. The card rail uses one status table per phase;
//! the PISP rail uses one rule per processor. New processors or status codes
//! are added here without touching the groupers.

use crate::types::status::{card, pisp};
use crate::types::{PaymentProcessor, PaymentRequestEvent, PayoutStatus};

/// Statuses of a `card_authorization` event that authorise the attempt
pub const CARD_AUTHORIZATION_SUCCESS: &[&str] = &[
    card::AUTHORIZED_SUCCESS,
    card::SOFT_DECLINE,
    card::CHECKOUT_AUTHORIZED,
    card::CHECKOUT_CARD_VERIFIED,
];

/// Statuses of a `card_sale` or `card_capture` event that settle the attempt
pub const CARD_CAPTURE_SUCCESS: &[&str] = &[
    card::AUTHORIZED_SUCCESS,
    card::SOFT_DECLINE,
    card::CHECKOUT_CAPTURED,
    card::CAPTURE_SUCCESS,
];

/// Statuses of a `card_void` event that refund the attempt
pub const CARD_VOID_SUCCESS: &[&str] = &[card::VOIDED_SUCCESS];

/// Authorisation rule for one PISP processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PispAuthorizationRule {
    pub processor: PaymentProcessor,

    /// Callback or webhook statuses that authorise the attempt
    pub statuses: &'static [&'static str],

    /// Bank status that vetoes an otherwise successful status
    pub rejected_bank_status: Option<&'static str>,
}

impl PispAuthorizationRule {
    /// Whether `event` satisfies this rule
    pub fn matches(&self, event: &PaymentRequestEvent) -> bool {
        if event.processor != self.processor {
            return false;
        }

        let status_accepted = status_in(event, self.statuses);

        let bank_rejected = self
            .rejected_bank_status
            .is_some_and(|rejected| event.pisp_bank_status.as_deref() == Some(rejected));

        status_accepted && !bank_rejected
    }
}

/// PISP authorisation rules, one per processor
///
/// Processors without a rule never authorise a PISP attempt.
pub const PISP_AUTHORIZATION_RULES: &[PispAuthorizationRule] = &[
    PispAuthorizationRule {
        processor: PaymentProcessor::Modulr,
        statuses: &[pisp::MODULR_SUCCESS],
        rejected_bank_status: Some(pisp::MODULR_BANK_REJECTED),
    },
    PispAuthorizationRule {
        processor: PaymentProcessor::NoFrixion,
        statuses: &[
            PayoutStatus::Queued.as_str(),
            PayoutStatus::QueuedUpstream.as_str(),
            PayoutStatus::Pending.as_str(),
            PayoutStatus::Processed.as_str(),
        ],
        rejected_bank_status: None,
    },
    PispAuthorizationRule {
        processor: PaymentProcessor::Plaid,
        statuses: &[pisp::PLAID_INITIATED, pisp::PLAID_SUCCESS],
        rejected_bank_status: None,
    },
    PispAuthorizationRule {
        processor: PaymentProcessor::Yapily,
        statuses: &[pisp::YAPILY_PENDING, pisp::YAPILY_COMPLETED],
        rejected_bank_status: None,
    },
];

fn status_in(event: &PaymentRequestEvent, table: &[&str]) -> bool {
    table.iter().any(|code| event.has_status(code))
}

pub fn is_card_authorization_success(event: &PaymentRequestEvent) -> bool {
    status_in(event, CARD_AUTHORIZATION_SUCCESS)
}

pub fn is_card_capture_success(event: &PaymentRequestEvent) -> bool {
    status_in(event, CARD_CAPTURE_SUCCESS)
}

pub fn is_card_void_success(event: &PaymentRequestEvent) -> bool {
    status_in(event, CARD_VOID_SUCCESS)
}

/// Whether a PISP callback or webhook authorises its attempt
pub fn is_pisp_authorization(event: &PaymentRequestEvent) -> bool {
    PISP_AUTHORIZATION_RULES
        .iter()
        .find(|rule| rule.processor == event.processor)
        .is_some_and(|rule| rule.matches(event))
}
