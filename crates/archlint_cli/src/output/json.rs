//! JSON output formatter

use archlint_core::ValidationReport;
use miette::{IntoDiagnostic, Result};

pub fn output_json(report: &ValidationReport) -> Result<()> {
    println!("{}", report.to_json().into_diagnostic()?);
    Ok(())
}
