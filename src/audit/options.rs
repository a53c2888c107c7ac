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
use serde::{Deserialize, Serialize};

/// Default staleness threshold used by the CLI and `ScanOptions::default()`.
pub const DEFAULT_DAYS_STALE: u32 = 90;

pub(crate) const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Policy parameters for one scan.
///
/// # Examples
///
/// ```
/// use cloud_audit::ScanOptions;
///
/// let options = ScanOptions::default()
///     .with_days_stale(30)
///     .with_oversize_mb(512.0)
///     .with_limit(1000);
/// assert_eq!(options.effective_limit(), Some(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Objects last modified more than this many days ago are stale
    #[serde(default = "default_days_stale")]
    pub days_stale: u32,

    /// Oversize threshold in MiB, `0` disables the check
    #[serde(default)]
    pub oversize_mb: f64,

    /// Stop pulling from the source after this many objects
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_days_stale() -> u32 {
    DEFAULT_DAYS_STALE
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            days_stale: DEFAULT_DAYS_STALE,
            oversize_mb: 0.0,
            limit: None,
        }
    }
}

impl ScanOptions {
    pub fn new(days_stale: u32) -> Self {
        Self {
            days_stale,
            ..Self::default()
        }
    }

    pub fn with_days_stale(mut self, days_stale: u32) -> Self {
        self.days_stale = days_stale;
        self
    }

    pub fn with_oversize_mb(mut self, oversize_mb: f64) -> Self {
        self.oversize_mb = oversize_mb;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The limit actually applied; zero means unlimited.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|n| *n > 0)
    }

    /// Oversize threshold in bytes, `None` when the check is disabled.
    pub fn oversize_threshold_bytes(&self) -> Option<u64> {
        if self.oversize_mb > 0.0 {
            Some((self.oversize_mb * BYTES_PER_MB).floor() as u64)
        } else {
            None
        }
    }

    pub fn validate(&self) -> AuditResult<()> {
        if !self.oversize_mb.is_finite() || self.oversize_mb < 0.0 {
            return Err(AuditError::InvalidConfiguration(format!(
                "oversize_mb must be a finite number >= 0, got {}",
                self.oversize_mb
            )));
        }
        Ok(())
    }
}
