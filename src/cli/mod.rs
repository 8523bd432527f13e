// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, StrategyType};

use crate::io::RequestAmounts;
use crate::strategy::ProcessingOptions;
use crate::types::AttemptError;
use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing input, or --help), clap
/// displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Build the processing options from CLI arguments, loading the amounts file if given
pub fn processing_options(args: &CliArgs) -> Result<ProcessingOptions, AttemptError> {
    let amounts = match &args.amounts {
        Some(path) => RequestAmounts::from_csv_path(path, args.amount)?,
        None => RequestAmounts::new(args.amount),
    };

    Ok(ProcessingOptions {
        amounts,
        format: args.format,
    })
}
