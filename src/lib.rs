//! Payment Attempt Reconstruction Library
//! # Overview
//!
//! Payment requests accumulate lifecycle events as payers try to pay them: card
//! authorisations, captures and voids, or open banking payment initiations,
//! callbacks, webhooks and settlements. This library groups those events into
//! payment attempts and works out how far each attempt got.
//!
//! # Architecture
//!
//! - [`types`] - Events, attempts, status vocabularies and errors
//! - [`core`] - Reconstruction:
//!   - [`core::card`] - Card attempts, keyed by authorisation response id
//!   - [`core::pisp`] - Bank transfer attempts, keyed by payment initiation id
//!   - [`core::classification`] - Which statuses count as success per processor
//!   - [`core::reconstructor`] - Composition of the rails
//! - [`io`] - CSV event input, CSV and JSON attempt output
//! - [`strategy`] - Sync and async pipelines from an event file to attempts
//! - [`cli`] - CLI arguments parsing
//!
//! # Attempt Milestones
//!
//! - **Initiated**: the event that started the attempt was seen
//! - **Authorized**: the processor accepted the payment
//! - **Settled**: funds were captured (card) or arrived (bank transfer)
//! - **Refunded**: a card authorisation was voided
//! - **Settlement failed**: a bank transfer did not arrive
//!
//! Reconstruction is pure and best effort: missing or contradictory events
//! leave milestones unset rather than failing.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    get_card_payment_attempts, get_payment_attempts, get_pisp_payment_attempts,
    AttemptGrouper, AttemptReconstructor, CardAttemptGrouper, PispAttemptGrouper,
};
pub use io::{write_attempts_csv, write_attempts_json, RequestAmounts};
pub use types::{
    AttemptError, AttemptStatus, Currency, PaymentAttempt, PaymentMethodType, PaymentProcessor,
    PaymentRequestEvent, PaymentRequestEventType, PaymentRequestId,
};
