//! Processor status vocabularies
//!
//! Status strings reported by the card processors, the PISP providers and the
//! NoFrixion payout engine. Matching against these codes is exact and case
//! sensitive, the processors report them verbatim.

use std::fmt;

/// Card processor response statuses
pub mod card {
    /// Authorisation (or sale) approved
    pub const AUTHORIZED_SUCCESS: &str = "AUTHORIZED";

    /// Approved by the issuer but flagged by the risk engine
    pub const SOFT_DECLINE: &str = "AUTHORIZED_RISK_DECLINED";

    pub const CHECKOUT_AUTHORIZED: &str = "Authorized";

    /// Zero amount card verification approved by Checkout.com
    pub const CHECKOUT_CARD_VERIFIED: &str = "Card Verified";

    pub const CHECKOUT_CAPTURED: &str = "Captured";

    /// Capture accepted and pending settlement
    pub const CAPTURE_SUCCESS: &str = "PENDING";

    pub const VOIDED_SUCCESS: &str = "VOIDED";
}

/// PISP provider result statuses
pub mod pisp {
    pub const MODULR_SUCCESS: &str = "EXECUTED";

    /// Bank status Modulr reports when the payer's bank refused the payment
    pub const MODULR_BANK_REJECTED: &str = "REJECTED";

    pub const PLAID_INITIATED: &str = "PAYMENT_STATUS_INITIATED";

    pub const PLAID_SUCCESS: &str = "PAYMENT_STATUS_EXECUTED";

    pub const YAPILY_PENDING: &str = "PENDING";

    pub const YAPILY_COMPLETED: &str = "COMPLETED";
}

/// NoFrixion payout statuses
///
/// NoFrixion-processed PISP payments are executed as payouts, so their callbacks
/// report the payout status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayoutStatus {
    PendingApproval,
    Queued,
    QueuedUpstream,
    Pending,
    Processed,
    Failed,
    Rejected,
}

impl PayoutStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::PendingApproval => "PENDING_APPROVAL",
            PayoutStatus::Queued => "QUEUED",
            PayoutStatus::QueuedUpstream => "QUEUED_UPSTREAM",
            PayoutStatus::Pending => "PENDING",
            PayoutStatus::Processed => "PROCESSED",
            PayoutStatus::Failed => "FAILED",
            PayoutStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
