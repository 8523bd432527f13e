//! I/O module
//!
//! Handles CSV event parsing and attempt output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (event record conversion, attempt serialization)
//! - `json_format` - JSON attempt serialization
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `amounts` - Payment request totals supplied alongside the events

pub mod amounts;
pub mod async_reader;
pub mod csv_format;
pub mod json_format;
pub mod sync_reader;

pub use amounts::RequestAmounts;
pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_attempts_csv, CsvEventRecord};
pub use json_format::write_attempts_json;
pub use sync_reader::SyncReader;

use crate::types::{AttemptError, PaymentAttempt};
use clap::ValueEnum;
use std::io::Write;

/// Serialization format of reconstructed attempts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Write attempts in the given format
pub fn write_attempts(
    format: OutputFormat,
    attempts: &[PaymentAttempt],
    output: &mut dyn Write,
) -> Result<(), AttemptError> {
    match format {
        OutputFormat::Csv => write_attempts_csv(attempts, output),
        OutputFormat::Json => write_attempts_json(attempts, output),
    }
}
