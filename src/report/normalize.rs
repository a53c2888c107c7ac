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

//! Turns scan output into report rows with a stable column set.

use super::ReportResult;
use crate::audit::record::{ObjectRecord, Status};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Columns that always lead, in this order, when present.
pub const PREFERRED_ORDER: [&str; 5] = ["path", "status", "size", "last_modified", "duplicate_id"];

/// Message row written in place of an empty result set.
pub const EMPTY_MESSAGE: &str = "No objects found or bucket empty";

pub type Row = Map<String, Value>;

/// Report status by priority: duplicate, then stale, then active.
pub fn status_for(record: &ObjectRecord) -> Status {
    if record.is_duplicate() {
        Status::Duplicate
    } else if record.is_stale {
        Status::Stale
    } else {
        Status::Active
    }
}

/// Backfill `status` on records that don't carry one yet.
pub fn ensure_status(records: &mut [ObjectRecord]) {
    for record in records.iter_mut().filter(|r| r.status.is_none()) {
        record.status = Some(status_for(record));
    }
}

/// Preferred columns first, then every other observed key sorted.
pub fn union_headers(rows: &[Row]) -> Vec<String> {
    let observed: BTreeSet<&str> = rows.iter().flat_map(|r| r.keys()).map(String::as_str).collect();

    let mut headers: Vec<String> = PREFERRED_ORDER
        .iter()
        .filter(|h| observed.contains(*h))
        .map(|h| h.to_string())
        .collect();
    headers.extend(
        observed
            .into_iter()
            .filter(|k| !PREFERRED_ORDER.contains(k))
            .map(str::to_string),
    );
    headers
}

/// Text of one cell; missing and `null` cells are empty.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Rows and headers ready for a writer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReport {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl NormalizedReport {
    pub fn from_records(records: &[ObjectRecord]) -> ReportResult<Self> {
        let rows = if records.is_empty() {
            let mut row = Row::new();
            row.insert("message".to_string(), Value::String(EMPTY_MESSAGE.to_string()));
            vec![row]
        } else {
            let mut records = records.to_vec();
            ensure_status(&mut records);
            records
                .iter()
                .map(|r| match serde_json::to_value(r)? {
                    Value::Object(map) => Ok(map),
                    _ => Ok(Row::new()),
                })
                .collect::<ReportResult<Vec<Row>>>()?
        };

        Ok(Self {
            headers: union_headers(&rows),
            rows,
        })
    }

    /// Rows whose status equals `status`.
    pub fn count_status(&self, status: Status) -> usize {
        self.rows
            .iter()
            .filter(|r| r.get("status").and_then(Value::as_str) == Some(status.as_str()))
            .count()
    }

    /// Rows with `is_oversized = true`, or `None` when oversize was not evaluated.
    pub fn count_oversized(&self) -> Option<usize> {
        if !self.headers.iter().any(|h| h == "is_oversized") {
            return None;
        }
        Some(
            self.rows
                .iter()
                .filter(|r| r.get("is_oversized") == Some(&Value::Bool(true)))
                .count(),
        )
    }

    pub fn cells<'a>(&'a self, row: &'a Row) -> impl Iterator<Item = String> + 'a {
        self.headers.iter().map(move |h| format_cell(row.get(h)))
    }
}
