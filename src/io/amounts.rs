//! Payment request totals
//!
//! PISP attempts take their attempted amount from the payment request rather
//! than from their events. Event exports don't carry that total, so it is
//! supplied separately: a CSV of `payment_request_id,amount` rows, plus a
//! default for payment requests the file doesn't list.

use crate::types::{AttemptError, PaymentRequestId};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct CsvAmountRecord {
    payment_request_id: String,
    amount: String,
}

/// Payment request total amounts, with a fallback for unlisted requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestAmounts {
    amounts: HashMap<PaymentRequestId, Decimal>,
    default_amount: Decimal,
}

impl RequestAmounts {
    /// Create an empty lookup where every request totals `default_amount`
    pub fn new(default_amount: Decimal) -> Self {
        Self {
            amounts: HashMap::new(),
            default_amount,
        }
    }

    pub fn insert(&mut self, payment_request_id: PaymentRequestId, amount: Decimal) {
        self.amounts.insert(payment_request_id, amount);
    }

    /// The total of `payment_request_id`, or the default amount
    pub fn get(&self, payment_request_id: &PaymentRequestId) -> Decimal {
        self.amounts
            .get(payment_request_id)
            .copied()
            .unwrap_or(self.default_amount)
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Load totals from a `payment_request_id,amount` CSV file
    ///
    /// Rows that fail to parse are logged and skipped. A later row for the same
    /// payment request replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header is unreadable.
    pub fn from_csv_path(path: &Path, default_amount: Decimal) -> Result<Self, AttemptError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AttemptError::file_not_found(&path.display().to_string()),
            _ => AttemptError::from(e),
        })?;

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
        let mut amounts = Self::new(default_amount);

        for result in reader.deserialize::<CsvAmountRecord>() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %AttemptError::from(e), "skipping malformed amount row");
                    continue;
                }
            };

            let Ok(payment_request_id) = Uuid::parse_str(&record.payment_request_id) else {
                warn!(
                    error = %AttemptError::invalid_payment_request_id(&record.payment_request_id),
                    "skipping malformed amount row"
                );
                continue;
            };
            let Ok(amount) = Decimal::from_str(&record.amount) else {
                warn!(
                    error = %AttemptError::invalid_amount(&record.amount),
                    "skipping malformed amount row"
                );
                continue;
            };

            amounts.insert(payment_request_id, amount);
        }

        Ok(amounts)
    }
}
