//! Asynchronous CSV reader with batch interface
//!
//! Provides batched reads of payment request events from a CSV export.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - tokio for async runtime and concurrency primitives
//! - Batch reading so events can be handed off while the file is still read
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of PaymentRequestEvents
//!                  ↓
//!           csv_format module
//!           (CsvEventRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvEventRecord};
use crate::types::{AttemptError, PaymentRequestEvent};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV event reader
///
/// Maintains streaming behavior: only the current batch is held in memory.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read a batch of events
    ///
    /// Reads up to `batch_size` records, converting them to events. Records
    /// that fail to parse or convert are logged and skipped, and do not count
    /// towards the batch.
    ///
    /// # Returns
    ///
    /// The converted events. An empty vector means the end of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails, e.g. the input is a
    /// directory or the disk goes away mid read.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<PaymentRequestEvent>, AttemptError> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvEventRecord>();

        while batch.len() < batch_size {
            let result = match records.next().await {
                Some(result) => result
                    .map_err(AttemptError::from)
                    .and_then(convert_csv_record),
                None => break,
            };

            match result {
                Ok(event) => batch.push(event),
                Err(e) if e.is_recoverable() => warn!(error = %e, "skipping event record"),
                Err(e) => return Err(e),
            }
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentProcessor, PaymentRequestEventType};
    use futures::io::Cursor;
    use rust_decimal::Decimal;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    const HEADER: &str =
        "payment_request_id,event_type,inserted_at,amount,processor,status,pisp_payment_initiation_id";

    fn csv(rows: &[&str]) -> String {
        let mut content = format!("{}\n", HEADER);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        content
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let content = csv(&[
            "00000000-0000-0000-0000-000000000001,pisp_initiate,2024-03-01T10:00:00Z,0,Yapily,,init-1",
            "00000000-0000-0000-0000-000000000001,pisp_webhook,2024-03-01T10:01:00Z,0,Yapily,COMPLETED,init-1",
            "00000000-0000-0000-0000-000000000002,pisp_settle,2024-03-01T10:02:00Z,12.50,,,init-2",
        ]);
        let mut async_reader = AsyncReader::new(Cursor::new(content.into_bytes()));

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].event_type, PaymentRequestEventType::PispInitiate);
        assert_eq!(batch[0].processor, PaymentProcessor::Yapily);
        assert_eq!(batch[1].status.as_deref(), Some("COMPLETED"));

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].amount, Decimal::new(1250, 2));
        assert_eq!(batch[0].pisp_payment_initiation_id.as_deref(), Some("init-2"));

        assert!(async_reader.read_batch(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = AsyncReader::new(Cursor::new(csv(&[]).into_bytes()));

        let batch = async_reader.read_batch(10).await.unwrap();
        assert_eq!(batch.len(), 0);
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_records() {
        let content = csv(&[
            "00000000-0000-0000-0000-000000000001,card_refund,2024-03-01T10:00:00Z,0,,,",
            "00000000-0000-0000-0000-000000000001,pisp_callback,yesterday,0,,,init-1",
            "00000000-0000-0000-0000-000000000001,pisp_callback,2024-03-01T10:00:00Z,0,Modulr,EXECUTED,init-1",
        ]);
        let mut async_reader = AsyncReader::new(Cursor::new(content.into_bytes()));

        let batch = async_reader.read_batch(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].processor, PaymentProcessor::Modulr);
    }

    #[tokio::test]
    async fn test_async_reader_missing_optional_columns() {
        let content = "payment_request_id,event_type,inserted_at\n\
            00000000-0000-0000-0000-000000000001,card_void,2024-03-01T10:00:00+01:00\n";
        let mut async_reader = AsyncReader::new(Cursor::new(content.as_bytes()));

        let batch = async_reader.read_batch(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].amount, Decimal::ZERO);
        assert_eq!(batch[0].status, None);
        assert_eq!(batch[0].inserted_at.to_rfc3339(), "2024-03-01T09:00:00+00:00");
    }

    /// Reader whose every read fails, as a directory or a dropped mount would
    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut [u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::Error::other("Is a directory")))
        }
    }

    #[tokio::test]
    async fn test_async_reader_fails_on_read_error() {
        let mut async_reader = AsyncReader::new(FailingReader);

        let result = async_reader.read_batch(10).await;
        assert!(matches!(result, Err(AttemptError::IoError { .. })));
    }
}
