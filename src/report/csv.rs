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

/// Quote a field when it contains a delimiter, quote, or line break.
pub fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_line<I: IntoIterator<Item = String>>(out: &mut String, fields: I) {
    let line: Vec<String> = fields.into_iter().map(|f| quote_field(&f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// Render a header line followed by one line per row, CRLF-terminated.
pub fn render(report: &NormalizedReport) -> String {
    let mut out = String::new();
    write_line(&mut out, report.headers.iter().cloned());
    for row in &report.rows {
        write_line(&mut out, report.cells(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::record::ObjectRecord;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field(""), "");
        assert_eq!(quote_field("a,b"), "\"a,b\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(quote_field("cr\rhere"), "\"cr\rhere\"");
    }

    #[test]
    fn test_render() {
        let record = ObjectRecord {
            path: "s3://b/a,b.txt".to_string(),
            size: 5,
            last_modified: Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap(),
            is_stale: true,
            is_oversized: None,
            duplicate_id: None,
            status: None,
        };
        let csv = render(&NormalizedReport::from_records(&[record]).unwrap());
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], "path,status,size,last_modified,duplicate_id,is_stale");
        assert_eq!(
            lines[1],
            "\"s3://b/a,b.txt\",stale,5,2024-01-31T12:00:00Z,,true"
        );
        assert_eq!(lines[2], "");
    }

    #[test]
    fn test_render_empty() {
        let csv = render(&NormalizedReport::from_records(&[]).unwrap());
        assert_eq!(csv, "message\r\nNo objects found or bucket empty\r\n");
    }
}
