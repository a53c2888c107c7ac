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

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Object metadata as yielded by a source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    /// Provider-namespaced path, e.g. `s3://bucket/key`
    pub path: String,

    /// Object size in bytes
    pub size: u64,

    /// Last modified timestamp as reported by the source
    pub last_modified: Option<DateTime<Utc>>,
}

impl RawObject {
    pub fn new(path: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size,
            last_modified: Some(last_modified),
        }
    }
}

/// Opaque duplicate group identifier.
///
/// Only meaningful as an equality key within one scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateId(String);

impl DuplicateId {
    pub(crate) fn from_hash(hash: u64) -> Self {
        Self(format!("group-{:016x}", hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DuplicateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Display status backfilled at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Duplicate,
    Stale,
    Active,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Duplicate => "duplicate",
            Status::Stale => "stale",
            Status::Active => "active",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A classified object, one per source object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub path: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub is_stale: bool,

    /// `None` when the oversize check is disabled, never `Some(false)` in that case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_oversized: Option<bool>,

    pub duplicate_id: Option<DuplicateId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl ObjectRecord {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.size, self.last_modified)
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicate_id.is_some()
    }
}

/// Duplicate-detection key: `(size, last_modified)` at whole-second precision.
///
/// Two unrelated objects that happen to share size and timestamp are
/// reported as duplicates; this is a metadata heuristic, not a content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

impl Fingerprint {
    pub fn new(size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            size,
            last_modified: truncate_to_seconds(last_modified),
        }
    }
}

/// Precision shared by staleness checks and fingerprints.
pub(crate) fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(0)
}
