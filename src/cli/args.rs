use crate::io::OutputFormat;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Reconstruct payment attempts from payment request events
#[derive(Parser, Debug)]
#[command(name = "moneymoov-attempts")]
#[command(about = "Reconstruct card and open banking payment attempts from payment request events", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing payment request events
    #[arg(value_name = "INPUT", help = "Path to the input events CSV file")]
    pub input_file: PathBuf,

    /// CSV of payment request totals
    #[arg(
        long = "amounts",
        value_name = "CSV",
        help = "CSV with payment_request_id,amount columns giving each payment request's total"
    )]
    pub amounts: Option<PathBuf>,

    /// Total for payment requests not listed in the amounts file
    #[arg(
        long = "amount",
        value_name = "DECIMAL",
        default_value = "0",
        help = "Default payment request total used as the attempted amount of bank transfers"
    )]
    pub amount: Decimal,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of events per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of events per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent reconstructions (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of payment requests reconstructing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "csv")]
    pub format: OutputFormat,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// `BatchConfig::new` with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }
}
