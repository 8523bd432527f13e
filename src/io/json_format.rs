//! JSON output of reconstructed attempts
//!
//! Attempts are written as a single JSON array. Each element carries the
//! attempt's fields plus its derived `status`.

use crate::types::{AttemptError, AttemptStatus, PaymentAttempt};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AttemptView<'a> {
    #[serde(flatten)]
    attempt: &'a PaymentAttempt,
    status: AttemptStatus,
}

/// Write attempts as a pretty printed JSON array, in the order given
pub fn write_attempts_json(
    attempts: &[PaymentAttempt],
    output: &mut dyn Write,
) -> Result<(), AttemptError> {
    let views: Vec<AttemptView<'_>> = attempts
        .iter()
        .map(|attempt| AttemptView {
            attempt,
            status: attempt.status(),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *output, &views)?;
    writeln!(output)?;
    output.flush()?;

    Ok(())
}
