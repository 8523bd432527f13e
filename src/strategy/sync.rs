//! Synchronous processing strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates reconstruction by coordinating
//! between the SyncReader (for CSV input) and the AttemptReconstructor.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Per payment request partitioning to `partition_by_payment_request`
//! - Attempt reconstruction to `AttemptReconstructor`
//! - Output to `io::write_attempts` (format handling)
//!
//! # Memory
//!
//! Events arrive in arbitrary order and an attempt cannot be closed until its
//! last event has been read, so the whole event set is held in memory.

use crate::core::{partition_by_payment_request, AttemptReconstructor};
use crate::io::sync_reader::SyncReader;
use crate::io::write_attempts;
use crate::strategy::{reconstruct_request, ProcessingOptions, ProcessingStrategy};
use crate::types::AttemptError;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use moneymoov_attempts::strategy::{ProcessingOptions, ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(ProcessingOptions::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("events.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    options: ProcessingOptions,
}

impl SyncProcessingStrategy {
    pub fn new(options: ProcessingOptions) -> Self {
        Self { options }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Reconstruct attempts from the input file and write them to output
    ///
    /// 1. Streams events from the CSV file, skipping malformed records and
    ///    stopping at the first read failure
    /// 2. Partitions the events by payment request id
    /// 3. Reconstructs each payment request in ascending id order
    /// 4. Writes all attempts in the configured format
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), AttemptError> {
        let reader = SyncReader::new(input_path)?;

        let mut events = Vec::new();
        for result in reader {
            match result {
                Ok(event) => events.push(event),
                Err(e) if e.is_recoverable() => warn!(error = %e, "skipping event record"),
                Err(e) => return Err(e),
            }
        }

        let reconstructor = AttemptReconstructor::new();
        let attempts: Vec<_> = partition_by_payment_request(events)
            .iter()
            .flat_map(|(payment_request_id, request_events)| {
                reconstruct_request(
                    &reconstructor,
                    &self.options.amounts,
                    payment_request_id,
                    request_events,
                )
            })
            .collect();

        write_attempts(self.options.format, &attempts, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{OutputFormat, RequestAmounts};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use uuid::Uuid;

    const HEADER: &str = "payment_request_id,event_type,inserted_at,amount,processor,status,card_authorization_response_id,pisp_payment_initiation_id";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(strategy: &SyncProcessingStrategy, rows: &[&str]) -> String {
        let file = create_temp_csv(&format!("{}\n{}\n", HEADER, rows.join("\n")));
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_sync_strategy_orders_by_payment_request() {
        let output = run(
            &SyncProcessingStrategy::default(),
            &[
                "00000000-0000-0000-0000-000000000002,card_authorization,2024-03-01T10:00:00Z,5.00,CyberSource,AUTHORIZED,auth-2,",
                "00000000-0000-0000-0000-000000000001,card_authorization,2024-03-01T11:00:00Z,7.00,CyberSource,AUTHORIZED,auth-1,",
            ],
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("00000000-0000-0000-0000-000000000001,auth-1,card,"));
        assert!(lines[2].starts_with("00000000-0000-0000-0000-000000000002,auth-2,card,"));
    }

    #[test]
    fn test_sync_strategy_uses_request_amounts() {
        let mut amounts = RequestAmounts::new(Decimal::ONE);
        amounts.insert(Uuid::from_u128(1), Decimal::new(9900, 2));
        let strategy = SyncProcessingStrategy::new(ProcessingOptions {
            amounts,
            format: OutputFormat::Csv,
        });

        let output = run(
            &strategy,
            &[
                "00000000-0000-0000-0000-000000000001,pisp_initiate,2024-03-01T10:00:00Z,0,Modulr,,,init-1",
                "00000000-0000-0000-0000-000000000002,pisp_initiate,2024-03-01T10:00:00Z,0,Modulr,,,init-2",
            ],
        );

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[1].contains(",init-1,pisp,Modulr,None,2024-03-01T10:00:00Z,99.00,"));
        assert!(lines[2].contains(",init-2,pisp,Modulr,None,2024-03-01T10:00:00Z,1,"));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(matches!(result, Err(AttemptError::FileNotFound { .. })));
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_record() {
        let output = run(
            &SyncProcessingStrategy::default(),
            &[
                "00000000-0000-0000-0000-000000000001,card_sale,2024-03-01T10:00:00Z,invalid,,,auth-1,",
                "00000000-0000-0000-0000-000000000001,card_authorization,2024-03-01T10:00:00Z,3.00,,AUTHORIZED,auth-2,",
            ],
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains(",auth-2,card,"));
    }

    #[test]
    fn test_sync_strategy_writes_json() {
        let strategy = SyncProcessingStrategy::new(ProcessingOptions {
            format: OutputFormat::Json,
            ..ProcessingOptions::default()
        });

        let output = run(
            &strategy,
            &["00000000-0000-0000-0000-000000000001,card_authorization,2024-03-01T10:00:00Z,3.00,,AUTHORIZED,auth-1,"],
        );

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["attempt_key"], "auth-1");
        assert_eq!(parsed[0]["status"], "authorized");
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
