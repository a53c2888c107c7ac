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

use crate::audit::record::{DuplicateId, ObjectRecord};
use crate::util::util::format_bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Aggregate counts over one scan's records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub location: String,
    pub total_objects: usize,
    pub total_bytes: u64,
    pub stale_objects: usize,
    pub stale_bytes: u64,
    pub duplicate_objects: usize,
    pub duplicate_groups: usize,
    /// Bytes held by every duplicate beyond the first of its group
    pub reclaimable_bytes: u64,
    /// `None` when the oversize check was disabled
    pub oversized_objects: Option<usize>,
}

impl AuditSummary {
    pub fn from_records(location: impl Into<String>, records: &[ObjectRecord]) -> Self {
        let mut summary = AuditSummary {
            location: location.into(),
            total_objects: records.len(),
            ..Default::default()
        };

        let mut groups: HashMap<&DuplicateId, (usize, u64)> = HashMap::new();
        for record in records {
            summary.total_bytes += record.size;
            if record.is_stale {
                summary.stale_objects += 1;
                summary.stale_bytes += record.size;
            }
            if let Some(oversized) = record.is_oversized {
                *summary.oversized_objects.get_or_insert(0) += usize::from(oversized);
            }
            if let Some(id) = &record.duplicate_id {
                summary.duplicate_objects += 1;
                let entry = groups.entry(id).or_insert((0, record.size));
                entry.0 += 1;
            }
        }

        summary.duplicate_groups = groups.len();
        summary.reclaimable_bytes = groups
            .values()
            .map(|(count, size)| (*count as u64).saturating_sub(1) * size)
            .sum();
        summary
    }
}

impl Display for AuditSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "\n{}", "━".repeat(80))?;
        writeln!(f, " {}", "Cloud Audit Summary")?;
        writeln!(f, "{}", "━".repeat(80))?;
        writeln!(f, " {}", self.location)?;
        writeln!(f, "{}", "━".repeat(80))?;

        writeln!(
            f,
            " {:<24} {:>10}   {:>12}",
            "Total Objects",
            self.total_objects,
            format_bytes(self.total_bytes)
        )?;
        writeln!(
            f,
            " {:<24} {:>10}   {:>12}",
            "Stale",
            self.stale_objects,
            format_bytes(self.stale_bytes)
        )?;
        writeln!(
            f,
            " {:<24} {:>10}   {:>12}",
            "Duplicates",
            self.duplicate_objects,
            format!("{} groups", self.duplicate_groups)
        )?;
        writeln!(
            f,
            " {:<24} {:>10}   {:>12}",
            "Reclaimable",
            "",
            format_bytes(self.reclaimable_bytes)
        )?;
        match self.oversized_objects {
            Some(count) => writeln!(f, " {:<24} {:>10}", "Oversized", count)?,
            None => writeln!(f, " {:<24} {:>10}", "Oversized", "off")?,
        }
        writeln!(f, "{}", "━".repeat(80))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(size: u64, stale: bool, dup: Option<u64>, oversized: Option<bool>) -> ObjectRecord {
        ObjectRecord {
            path: format!("s3://b/{}", size),
            size,
            last_modified: Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap(),
            is_stale: stale,
            is_oversized: oversized,
            duplicate_id: dup.map(DuplicateId::from_hash),
            status: None,
        }
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            record(100, true, None, None),
            record(50, false, Some(1), None),
            record(50, true, Some(1), None),
            record(50, false, Some(1), None),
            record(10, false, Some(2), None),
            record(10, false, Some(2), None),
        ];
        let summary = AuditSummary::from_records("s3://b", &records);

        assert_eq!(summary.total_objects, 6);
        assert_eq!(summary.total_bytes, 270);
        assert_eq!(summary.stale_objects, 2);
        assert_eq!(summary.stale_bytes, 150);
        assert_eq!(summary.duplicate_objects, 5);
        assert_eq!(summary.duplicate_groups, 2);
        assert_eq!(summary.reclaimable_bytes, 2 * 50 + 10);
        assert_eq!(summary.oversized_objects, None);
    }

    #[test]
    fn test_oversized_counted_when_evaluated() {
        let records = vec![
            record(1, false, None, Some(false)),
            record(2, false, None, Some(true)),
        ];
        let summary = AuditSummary::from_records("gs://b", &records);
        assert_eq!(summary.oversized_objects, Some(1));
    }

    #[test]
    fn test_display() {
        let summary = AuditSummary::from_records("s3://b", &[record(2048, true, None, None)]);
        let text = summary.to_string();
        assert!(text.contains("Cloud Audit Summary"));
        assert!(text.contains("s3://b"));
        assert!(text.contains("2.00 KB"));
        assert!(text.contains("off"));
    }

    #[test]
    fn test_empty() {
        let summary = AuditSummary::from_records("file:///tmp", &[]);
        assert_eq!(summary.total_objects, 0);
        assert_eq!(summary.reclaimable_bytes, 0);
    }
}
