//! CSV format handling for event exports and attempt output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvEventRecord structure for deserialization
//! - Conversion from CSV records to domain events
//! - Attempt output serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{
    AttemptError, Currency, PaymentAttempt, PaymentProcessor, PaymentRequestEvent,
    PaymentRequestEventType,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;
use uuid::Uuid;

/// Column order of the attempt CSV output
pub const ATTEMPT_CSV_HEADER: [&str; 17] = [
    "payment_request_id",
    "attempt_key",
    "payment_method",
    "processor",
    "currency",
    "initiated_at",
    "attempted_amount",
    "authorized_at",
    "authorized_amount",
    "settled_at",
    "settled_amount",
    "refunded_at",
    "refunded_amount",
    "settlement_failed_at",
    "institution_id",
    "wallet_name",
    "status",
];

/// CSV record structure for deserialization
///
/// Matches the event export columns. Every column is read as text and
/// converted by `convert_csv_record`, so conversion errors can name the bad
/// value. Rail specific columns may be missing from the export entirely.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CsvEventRecord {
    pub payment_request_id: String,
    pub event_type: String,
    pub inserted_at: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub processor: Option<String>,
    #[serde(default)]
    pub card_request_id: Option<String>,
    #[serde(default)]
    pub card_authorization_response_id: Option<String>,
    #[serde(default)]
    pub pisp_payment_initiation_id: Option<String>,
    #[serde(default)]
    pub pisp_payment_service_provider_id: Option<String>,
    #[serde(default)]
    pub pisp_bank_status: Option<String>,
    #[serde(default)]
    pub wallet_name: Option<String>,
}

/// Trim an optional column, treating blank values as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Convert a CsvEventRecord to a PaymentRequestEvent
///
/// This function:
/// - Parses the payment request ID as a UUID
/// - Parses the event type, processor and currency (case insensitive)
/// - Parses the RFC 3339 timestamp into UTC
/// - Parses the amount into a Decimal, blank amounts being zero
///
/// # Returns
///
/// * `Ok(PaymentRequestEvent)` - Successfully converted record
/// * `Err(AttemptError)` - The first column that failed to convert
pub fn convert_csv_record(csv_record: CsvEventRecord) -> Result<PaymentRequestEvent, AttemptError> {
    let payment_request_id = Uuid::parse_str(csv_record.payment_request_id.trim())
        .map_err(|_| AttemptError::invalid_payment_request_id(&csv_record.payment_request_id))?;

    let event_type = PaymentRequestEventType::from_str(&csv_record.event_type)
        .map_err(|_| AttemptError::invalid_event_type(&csv_record.event_type))?;

    let inserted_at = DateTime::parse_from_rfc3339(csv_record.inserted_at.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| AttemptError::invalid_timestamp(&csv_record.inserted_at))?;

    let amount = match non_blank(csv_record.amount) {
        Some(amount_str) => Decimal::from_str(&amount_str)
            .map_err(|_| AttemptError::invalid_amount(&amount_str))?,
        None => Decimal::ZERO,
    };

    let currency = match non_blank(csv_record.currency) {
        Some(currency) => {
            Currency::from_str(&currency).map_err(|_| AttemptError::invalid_currency(&currency))?
        }
        None => Currency::None,
    };

    let processor = match non_blank(csv_record.processor) {
        Some(processor) => PaymentProcessor::from_str(&processor)
            .map_err(|_| AttemptError::invalid_processor(&processor))?,
        None => PaymentProcessor::None,
    };

    Ok(PaymentRequestEvent {
        payment_request_id,
        event_type,
        inserted_at,
        amount,
        currency,
        status: non_blank(csv_record.status),
        processor,
        card_request_id: non_blank(csv_record.card_request_id),
        card_authorization_response_id: non_blank(csv_record.card_authorization_response_id),
        pisp_payment_initiation_id: non_blank(csv_record.pisp_payment_initiation_id),
        pisp_payment_service_provider_id: non_blank(csv_record.pisp_payment_service_provider_id),
        pisp_bank_status: non_blank(csv_record.pisp_bank_status),
        wallet_name: non_blank(csv_record.wallet_name),
    })
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

fn format_amount(amount: Option<Decimal>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

/// Write attempts in CSV format
///
/// Attempts are written in the order given, one row each, with the columns of
/// `ATTEMPT_CSV_HEADER`. Absent milestones are written as empty fields and
/// the last column holds the attempt's derived status.
pub fn write_attempts_csv(
    attempts: &[PaymentAttempt],
    output: &mut dyn Write,
) -> Result<(), AttemptError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(ATTEMPT_CSV_HEADER)
        .map_err(|e| AttemptError::output_error(format!("Failed to write CSV header: {}", e)))?;

    for attempt in attempts {
        writer
            .write_record(&[
                attempt.payment_request_id.to_string(),
                attempt.attempt_key.clone(),
                attempt.payment_method.to_string(),
                attempt.processor.to_string(),
                attempt.currency.to_string(),
                format_timestamp(attempt.initiated_at),
                attempt.attempted_amount.to_string(),
                format_timestamp(attempt.authorized_at),
                format_amount(attempt.authorized_amount),
                format_timestamp(attempt.settled_at),
                format_amount(attempt.settled_amount),
                format_timestamp(attempt.refunded_at),
                format_amount(attempt.refunded_amount),
                format_timestamp(attempt.settlement_failed_at),
                attempt.institution_id.clone().unwrap_or_default(),
                attempt.wallet_name.clone().unwrap_or_default(),
                attempt.status().to_string(),
            ])
            .map_err(|e| {
                AttemptError::output_error(format!("Failed to write attempt record: {}", e))
            })?;
    }

    writer
        .flush()
        .map_err(|e| AttemptError::output_error(format!("Failed to flush output: {}", e)))?;

    Ok(())
}
