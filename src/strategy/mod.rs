//! Processing strategy module for attempt reconstruction
//!
//! This module defines the Strategy pattern for complete reconstruction pipelines,
//! encompassing CSV parsing, per payment request reconstruction and output. This
//! allows different implementations (synchronous, asynchronous batch) to be
//! selected at runtime.
//!
//! Every strategy produces the same output for the same input: attempts ordered
//! by payment request id, then in reconstruction order within a payment request.

use crate::cli::StrategyType;
use crate::core::AttemptReconstructor;
use crate::io::{OutputFormat, RequestAmounts};
use crate::types::{AttemptError, PaymentAttempt, PaymentRequestEvent, PaymentRequestId};
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete reconstruction pipelines
///
/// Each strategy reads payment request events from a CSV file, reconstructs the
/// attempts of every payment request found, and writes them to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Reconstruct attempts from the events in `input_path` and write them to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - A fatal I/O error occurs during reading or writing
    /// - Output cannot be written
    ///
    /// Malformed event records are logged and skipped and do not cause this
    /// method to return an error.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), AttemptError>;
}

/// Settings shared by every strategy
#[derive(Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// Total amount of each payment request, used as PISP attempted amount
    pub amounts: RequestAmounts,
    pub format: OutputFormat,
}

/// Reconstruct the attempts of one payment request
pub(crate) fn reconstruct_request(
    reconstructor: &AttemptReconstructor,
    amounts: &RequestAmounts,
    payment_request_id: &PaymentRequestId,
    events: &[PaymentRequestEvent],
) -> Vec<PaymentAttempt> {
    let attempts = reconstructor.reconstruct(events, amounts.get(payment_request_id));
    debug!(
        %payment_request_id,
        events = events.len(),
        attempts = attempts.len(),
        "reconstructed payment request"
    );
    attempts
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
/// * `options` - Payment request amounts and output format
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    options: ProcessingOptions,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(options)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, options))
        }
    }
}
