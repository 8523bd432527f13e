//! Benchmark suite for attempt reconstruction
//!
//! Measures in-memory reconstruction of a single payment request, and the
//! complete sync and async pipelines over a generated event file, using the
//! divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use chrono::{DateTime, Duration, Utc};
use moneymoov_attempts::cli::StrategyType;
use moneymoov_attempts::io::csv_format::CsvEventRecord;
use moneymoov_attempts::strategy::{create_strategy, BatchConfig, ProcessingOptions};
use moneymoov_attempts::{
    get_payment_attempts, PaymentProcessor, PaymentRequestEvent, PaymentRequestEventType,
};
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;
use uuid::Uuid;

fn main() {
    divan::main();
}

fn at(offset_secs: i64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + Duration::days(19_000) + Duration::seconds(offset_secs)
}

/// Events of `attempts` card attempts and `attempts` PISP attempts on one payment request
fn payment_request_events(payment_request_id: Uuid, attempts: usize) -> Vec<PaymentRequestEvent> {
    let mut events = Vec::with_capacity(attempts * 5);
    for n in 0..attempts {
        let offset = (n * 10) as i64;
        let card_key = format!("auth-{}", n);
        let pisp_key = format!("init-{}", n);

        let card = [
            (PaymentRequestEventType::CardAuthorization, "AUTHORIZED", 0),
            (PaymentRequestEventType::CardCapture, "PENDING", 5),
        ];
        for (event_type, status, delay) in card {
            let mut event =
                PaymentRequestEvent::new(payment_request_id, event_type, at(offset + delay), Decimal::TEN);
            event.card_authorization_response_id = Some(card_key.clone());
            event.status = Some(status.to_string());
            event.processor = PaymentProcessor::CyberSource;
            events.push(event);
        }

        let pisp = [
            (PaymentRequestEventType::PispInitiate, None, 1),
            (PaymentRequestEventType::PispWebhook, Some("EXECUTED"), 2),
            (PaymentRequestEventType::PispSettle, None, 8),
        ];
        for (event_type, status, delay) in pisp {
            let mut event =
                PaymentRequestEvent::new(payment_request_id, event_type, at(offset + delay), Decimal::TEN);
            event.pisp_payment_initiation_id = Some(pisp_key.clone());
            event.status = status.map(str::to_string);
            event.processor = PaymentProcessor::Modulr;
            events.push(event);
        }
    }
    // Webhooks arrive out of order
    events.reverse();
    events
}

/// Write an event export of `requests` payment requests with 4 attempts each
fn event_file(requests: u128) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    {
        let mut writer = csv::Writer::from_writer(&mut file);
        for id in 0..requests {
            for event in payment_request_events(Uuid::from_u128(id + 1), 4) {
                writer
                    .serialize(CsvEventRecord {
                        payment_request_id: event.payment_request_id.to_string(),
                        event_type: event.event_type.to_string(),
                        inserted_at: event.inserted_at.to_rfc3339(),
                        amount: Some(event.amount.to_string()),
                        status: event.status,
                        processor: Some(event.processor.to_string()),
                        card_authorization_response_id: event.card_authorization_response_id,
                        pisp_payment_initiation_id: event.pisp_payment_initiation_id,
                        ..CsvEventRecord::default()
                    })
                    .expect("Failed to write event");
            }
        }
        writer.flush().expect("Failed to flush events");
    }
    file
}

#[divan::bench(args = [1, 10, 100])]
fn reconstruct_payment_request(bencher: divan::Bencher, attempts: usize) {
    let events = payment_request_events(Uuid::from_u128(1), attempts);

    bencher.bench(|| get_payment_attempts(divan::black_box(&events), Decimal::ONE_HUNDRED));
}

#[divan::bench(args = [10, 1_000])]
fn sync_strategy(bencher: divan::Bencher, requests: u128) {
    let file = event_file(requests);
    let strategy = create_strategy(StrategyType::Sync, None, ProcessingOptions::default());

    bencher.bench(|| {
        let mut output = Vec::new();
        strategy
            .process(file.path(), &mut output)
            .expect("Processing failed");
        output
    });
}

#[divan::bench(args = [10, 1_000])]
fn async_strategy(bencher: divan::Bencher, requests: u128) {
    let file = event_file(requests);
    let strategy = create_strategy(
        StrategyType::Async,
        Some(BatchConfig::default()),
        ProcessingOptions::default(),
    );

    bencher.bench(|| {
        let mut output = Vec::new();
        strategy
            .process(file.path(), &mut output)
            .expect("Processing failed");
        output
    });
}
