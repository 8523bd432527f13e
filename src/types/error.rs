//! Error types for the attempt reconstruction tooling
//!
//! The reconstructor itself never fails: incomplete or contradictory event logs
//! degrade into partially populated attempts. Errors only arise at the edges,
//! while reading event exports and writing reconstructed attempts.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Parsing Errors**: Malformed CSV, unknown event types, bad amounts, etc.
//! - **Output Errors**: Failure to serialize or write attempts
//! - **Runtime Errors**: The async runtime could not be created

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttemptError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown event type encountered
    #[error("Invalid event type '{event_type}'")]
    InvalidEventType { event_type: String },

    /// Amount could not be parsed as a decimal
    #[error("Invalid amount '{amount}'")]
    InvalidAmount { amount: String },

    /// Timestamp was not RFC 3339
    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("Invalid payment request ID '{value}'")]
    InvalidPaymentRequestId { value: String },

    #[error("Unknown payment processor '{processor}'")]
    InvalidProcessor { processor: String },

    #[error("Unknown currency '{currency}'")]
    InvalidCurrency { currency: String },

    /// Reconstructed attempts could not be written
    #[error("Output error: {message}")]
    OutputError { message: String },

    /// The async runtime could not be started
    #[error("Runtime error: {message}")]
    RuntimeError { message: String },
}

impl From<std::io::Error> for AttemptError {
    fn from(error: std::io::Error) -> Self {
        AttemptError::IoError {
            message: error.to_string(),
        }
    }
}

/// Read failures of the underlying file are I/O errors, everything else is a
/// parse error of the current record
impl From<csv::Error> for AttemptError {
    fn from(error: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_error) = error.kind() {
            return AttemptError::IoError {
                message: io_error.to_string(),
            };
        }

        let line = error.position().map(|pos| pos.line());

        AttemptError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for AttemptError {
    fn from(error: csv_async::Error) -> Self {
        if let csv_async::ErrorKind::Io(io_error) = error.kind() {
            return AttemptError::IoError {
                message: io_error.to_string(),
            };
        }

        AttemptError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for AttemptError {
    fn from(error: serde_json::Error) -> Self {
        AttemptError::OutputError {
            message: error.to_string(),
        }
    }
}

impl AttemptError {
    pub fn file_not_found(path: &str) -> Self {
        AttemptError::FileNotFound {
            path: path.to_string(),
        }
    }

    pub fn parse_error(line: Option<u64>, message: &str) -> Self {
        AttemptError::ParseError {
            line,
            message: message.to_string(),
        }
    }

    pub fn invalid_event_type(event_type: &str) -> Self {
        AttemptError::InvalidEventType {
            event_type: event_type.to_string(),
        }
    }

    pub fn invalid_amount(amount: &str) -> Self {
        AttemptError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    pub fn invalid_timestamp(value: &str) -> Self {
        AttemptError::InvalidTimestamp {
            value: value.to_string(),
        }
    }

    pub fn invalid_payment_request_id(value: &str) -> Self {
        AttemptError::InvalidPaymentRequestId {
            value: value.to_string(),
        }
    }

    pub fn invalid_processor(processor: &str) -> Self {
        AttemptError::InvalidProcessor {
            processor: processor.to_string(),
        }
    }

    pub fn invalid_currency(currency: &str) -> Self {
        AttemptError::InvalidCurrency {
            currency: currency.to_string(),
        }
    }

    pub fn output_error(message: impl Into<String>) -> Self {
        AttemptError::OutputError {
            message: message.into(),
        }
    }

    pub fn runtime_error(message: impl Into<String>) -> Self {
        AttemptError::RuntimeError {
            message: message.into(),
        }
    }

    /// Whether processing can continue past this error
    ///
    /// Record level errors skip the offending record; everything else aborts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AttemptError::ParseError { .. }
                | AttemptError::InvalidEventType { .. }
                | AttemptError::InvalidAmount { .. }
                | AttemptError::InvalidTimestamp { .. }
                | AttemptError::InvalidPaymentRequestId { .. }
                | AttemptError::InvalidProcessor { .. }
                | AttemptError::InvalidCurrency { .. }
        )
    }
}
