//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `event`: Payment request events and their vocabularies
//! - `attempt`: Reconstructed payment attempts
//! - `status`: Processor status codes
//! - `error`: Error types

pub mod attempt;
pub mod error;
pub mod event;
pub mod status;

pub use attempt::{AttemptStatus, PaymentAttempt, PaymentMethodType};
pub use error::AttemptError;
pub use event::{
    Currency, PaymentProcessor, PaymentRequestEvent, PaymentRequestEventType, PaymentRequestId,
};
pub use status::PayoutStatus;
