use super::normalize::NormalizedReport;
use super::ReportResult;

/// Render rows as a pretty-printed JSON array.
pub fn render(report: &NormalizedReport) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(&report.rows)?)
}
