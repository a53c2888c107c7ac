// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use super::normalize::NormalizedReport;
use crate::audit::record::Status;
use serde_json::Value;
use std::fmt::Write;

const STYLE: &str = "table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif; }";

/// Escape text for element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn row_color(status: Option<&str>) -> &'static str {
    match status {
        Some(s) if s == Status::Duplicate.as_str() => "#fff3cd",
        Some(s) if s == Status::Stale.as_str() => "#f8d7da",
        _ => "",
    }
}

/// Render a self-contained HTML page.
pub fn render(report: &NormalizedReport) -> String {
    let mut html = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        html,
        "<html><head><meta charset='utf-8'><title>Cloud Audit Report</title>"
    );
    let _ = writeln!(html, "<style>\n{}\n</style></head><body>", STYLE);
    let _ = writeln!(html, "<h2>Cloud Audit Report</h2>");

    let mut summary = format!(
        "Total Files: {} &bull; Stale: {} &bull; Duplicates: {}",
        report.rows.len(),
        report.count_status(Status::Stale),
        report.count_status(Status::Duplicate)
    );
    if let Some(oversized) = report.count_oversized() {
        let _ = write!(summary, " &bull; Oversized: {}", oversized);
    }
    let _ = writeln!(html, "<p>{}</p>", summary);

    let _ = writeln!(html, "<table>");
    let header_cells: String = report
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();
    let _ = writeln!(html, "<tr>{}</tr>", header_cells);

    for row in &report.rows {
        let color = row_color(row.get("status").and_then(Value::as_str));
        let cells: String = report
            .cells(row)
            .map(|c| format!("<td>{}</td>", escape(&c)))
            .collect();
        let _ = writeln!(html, "<tr style=\"background-color:{}\">{}</tr>", color, cells);
    }

    html.push_str("</table></body></html>\n");
    html
}
