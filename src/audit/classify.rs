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

use super::error::{AuditError, AuditResult};
use super::options::ScanOptions;
use super::record::{truncate_to_seconds, ObjectRecord, RawObject};
use chrono::{DateTime, Duration, Utc};

/// Per-object flags computed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_stale: bool,
    pub is_oversized: Option<bool>,
}

/// Staleness cutoff and oversize threshold, fixed once per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    cutoff: DateTime<Utc>,
    oversize_threshold_bytes: Option<u64>,
}

impl ScanPolicy {
    /// Captures the cutoff from a single `now`.
    pub fn new(now: DateTime<Utc>, options: &ScanOptions) -> Self {
        Self::with_threshold(
            now,
            options.days_stale,
            options.oversize_threshold_bytes().unwrap_or(0),
        )
    }

    /// `oversize_threshold_bytes == 0` disables the oversize check.
    pub fn with_threshold(
        now: DateTime<Utc>,
        days_stale: u32,
        oversize_threshold_bytes: u64,
    ) -> Self {
        // An unrepresentable cutoff lies before every timestamp, so nothing is stale.
        let cutoff = truncate_to_seconds(now)
            .checked_sub_signed(Duration::days(i64::from(days_stale)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Self {
            cutoff,
            oversize_threshold_bytes: (oversize_threshold_bytes > 0)
                .then_some(oversize_threshold_bytes),
        }
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn oversize_threshold_bytes(&self) -> Option<u64> {
        self.oversize_threshold_bytes
    }

    pub fn classify(&self, raw: &RawObject) -> AuditResult<Classification> {
        let last_modified = checked_timestamp(raw)?;

        Ok(Classification {
            is_stale: truncate_to_seconds(last_modified) < self.cutoff,
            is_oversized: self.oversize_threshold_bytes.map(|limit| raw.size > limit),
        })
    }

    /// Classify and convert into a record with no duplicate group yet.
    pub fn to_record(&self, raw: RawObject) -> AuditResult<ObjectRecord> {
        let classification = self.classify(&raw)?;
        let last_modified = checked_timestamp(&raw)?;

        Ok(ObjectRecord {
            path: raw.path,
            size: raw.size,
            last_modified,
            is_stale: classification.is_stale,
            is_oversized: classification.is_oversized,
            duplicate_id: None,
            status: None,
        })
    }
}

/// Classify a single object. Prefer [`ScanPolicy`] when classifying many
/// objects so they share one cutoff.
pub fn classify(
    raw: &RawObject,
    now: DateTime<Utc>,
    days_stale: u32,
    oversize_threshold_bytes: u64,
) -> AuditResult<Classification> {
    ScanPolicy::with_threshold(now, days_stale, oversize_threshold_bytes).classify(raw)
}

fn checked_timestamp(raw: &RawObject) -> AuditResult<DateTime<Utc>> {
    if raw.path.is_empty() {
        return Err(AuditError::MalformedRecord {
            path: String::new(),
            reason: "empty path".to_string(),
        });
    }
    raw.last_modified
        .ok_or_else(|| AuditError::MalformedRecord {
            path: raw.path.clone(),
            reason: "missing last_modified".to_string(),
        })
}
