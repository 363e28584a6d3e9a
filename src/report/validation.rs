//! Validation report rendering.

use crate::analysis::ValidationReport;
use std::fmt;
use std::io::{self, Write};

impl ValidationReport {
    /// Returns the diagnostics as display strings, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.valid { "PASS" } else { "FAIL" };
        write!(f, "[{}] {}", verdict, self.container)?;
        for (n, diagnostic) in self.diagnostics.iter().enumerate() {
            write!(f, "\n    {:>3}. {}", n + 1, diagnostic)?;
        }
        Ok(())
    }
}

/// Writes every report followed by a one-line summary.
///
/// # Returns
///
/// `true` if every report passed.
pub fn write_reports<W: Write>(out: &mut W, reports: &[ValidationReport]) -> io::Result<bool> {
    for report in reports {
        writeln!(out, "{}", report)?;
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    writeln!(
        out,
        "{} containers checked, {} passed, {} failed",
        reports.len(),
        reports.len() - failed,
        failed
    )?;
    Ok(failed == 0)
}
