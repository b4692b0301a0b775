//! JSON reporter
//!
//! Outputs the full FraudReport as pretty-printed JSON, the document the
//! downstream visualization tools read.

use crate::models::FraudReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &FraudReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render report as compact JSON (single line)
pub fn render_compact(report: &FraudReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}
