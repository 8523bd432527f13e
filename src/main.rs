//! Payment attempt reconstruction CLI
//!
//! Reads a CSV export of payment request events and writes the reconstructed
//! payment attempts to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- events.csv > attempts.csv
//! cargo run -- --strategy sync --amount 25.00 events.csv > attempts.csv
//! cargo run -- --amounts totals.csv --format json events.csv > attempts.json
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 events.csv > attempts.csv
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=debug`) for more detail.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use moneymoov_attempts::cli;
use moneymoov_attempts::strategy;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let options = match cli::processing_options(&args) {
        Ok(options) => options,
        Err(e) => {
            error!(error = %e, "failed to load payment request amounts");
            process::exit(1);
        }
    };

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, options)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "processing failed");
        process::exit(1);
    }
}
