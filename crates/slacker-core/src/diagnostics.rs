//! Human-readable failure reporting.

use std::io::{self, Write};

use crate::dispatcher::{DispatchReport, Failure};

pub fn failure_line(failure: &Failure<'_>) -> String {
    format!(
        "Cannot {} in {}: {}",
        failure.action, failure.account, failure.error
    )
}

/// Write one line per failed action. Called once after every account finished,
/// so lines from different accounts never interleave.
pub fn write_failures<W: Write>(report: &DispatchReport, out: &mut W) -> io::Result<()> {
    for failure in report.failures() {
        writeln!(out, "{}", failure_line(&failure))?;
    }
    out.flush()
}
