//! Core business logic module
//!
//! This module contains the attempt reconstruction components:
//! - `traits` - The per-rail grouper abstraction
//! - `grouping` - Correlation key grouping shared by the rails
//! - `classification` - Status tables deciding which events reach a milestone
//! - `card` - Card attempt reconstruction
//! - `pisp` - PISP attempt reconstruction
//! - `reconstructor` - Composition of the rails

pub mod card;
pub mod classification;
pub mod grouping;
pub mod pisp;
pub mod reconstructor;
pub mod traits;

pub use card::CardAttemptGrouper;
pub use grouping::partition_by_payment_request;
pub use pisp::PispAttemptGrouper;
pub use reconstructor::{
    get_card_payment_attempts, get_payment_attempts, get_pisp_payment_attempts,
    AttemptReconstructor,
};
pub use traits::AttemptGrouper;
