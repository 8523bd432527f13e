//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over payment request events from a CSV export.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - Individual record errors are yielded as Err variants in the iterator,
//!   tagged with the record's line number
//! - Read failures mid file are yielded as `IoError`, which callers treat as
//!   fatal
//!
//! ```no_run
//! use moneymoov_attempts::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("events.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(event) => println!("Read event: {:?}", event.event_type),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use crate::io::csv_format::{convert_csv_record, CsvEventRecord};
use crate::types::{AttemptError, PaymentRequestEvent};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV event reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (rail specific columns may be absent)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file doesn't exist, or an I/O or parse
    /// error if it cannot be opened or its header cannot be read.
    pub fn new(path: &Path) -> Result<Self, AttemptError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AttemptError::file_not_found(&path.display().to_string()),
            _ => AttemptError::from(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<PaymentRequestEvent, AttemptError>;

    /// Get the next event from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(PaymentRequestEvent))` - Successfully parsed record
    /// * `Some(Err(AttemptError))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
            Ok(true) => {
                let line = self.record.position().map(|position| position.line());
                let event = self
                    .record
                    .deserialize::<CsvEventRecord>(Some(&self.headers))
                    .map_err(AttemptError::from)
                    .and_then(convert_csv_record)
                    .map_err(|e| match e {
                        AttemptError::ParseError { .. } => e,
                        other => AttemptError::parse_error(line, &other.to_string()),
                    });
                Some(event)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentRequestEventType;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "payment_request_id,event_type,inserted_at,amount,status,card_authorization_response_id";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(matches!(result, Err(AttemptError::FileNotFound { .. })));
    }

    #[test]
    fn test_sync_reader_iterates_events() {
        let file = create_temp_csv(&format!(
            "{}\n\
             00000000-0000-0000-0000-000000000001,card_authorization,2024-03-01T10:00:00Z,10.00,AUTHORIZED,auth-1\n\
             00000000-0000-0000-0000-000000000001,card_capture,2024-03-01T10:01:00Z,10.00,PENDING,auth-1\n",
            HEADER
        ));

        let events: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, PaymentRequestEventType::CardAuthorization);
        assert_eq!(events[0].amount, Decimal::new(1000, 2));
        assert_eq!(events[1].status.as_deref(), Some("PENDING"));
        assert_eq!(events[1].card_authorization_response_id.as_deref(), Some("auth-1"));
        assert_eq!(events[1].pisp_payment_initiation_id, None);
    }

    #[test]
    fn test_sync_reader_reports_line_of_bad_record() {
        let file = create_temp_csv(&format!(
            "{}\n\
             00000000-0000-0000-0000-000000000001,card_sale,2024-03-01T10:00:00Z,10.00,,auth-1\n\
             00000000-0000-0000-0000-000000000001,card_sale,2024-03-01T10:00:00Z,ten,,auth-1\n\
             00000000-0000-0000-0000-000000000001,card_void,2024-03-01T10:02:00Z,10.00,VOIDED,auth-1\n",
            HEADER
        ));

        let results: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        let error = results[1].as_ref().unwrap_err();
        assert_eq!(
            error.to_string(),
            "CSV parse error at line 3: Invalid amount 'ten'"
        );
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_sync_reader_whitespace_handling() {
        let file = create_temp_csv(&format!(
            "{}\n  00000000-0000-0000-0000-000000000001 , pisp_initiate , 2024-03-01T10:00:00Z , 1 , , \n",
            HEADER
        ));

        let events: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, PaymentRequestEventType::PispInitiate);
        assert_eq!(events[0].status, None);
    }
}
