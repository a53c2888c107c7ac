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

use super::error::AuditResult;
use super::options::ScanOptions;
use super::pipeline;
use super::record::ObjectRecord;
use crate::storage::config::StorageConfig;
use crate::storage::factory::SourceFactory;
use crate::storage::provider::ObjectSource;
use crate::util::util::measure_dur_async;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builder for creating `Auditor` instances with custom configuration.
///
/// # Examples
///
/// ```no_run
/// use cloud_audit::{Auditor, StorageConfig};
///
/// # async fn example() -> Result<(), cloud_audit::AuditError> {
/// let config = StorageConfig::aws().with_option("bucket", "my-bucket");
/// let auditor = Auditor::builder(config)
///     .with_days_stale(30)
///     .with_oversize_mb(512.0)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AuditorBuilder {
    config: StorageConfig,
    options: ScanOptions,
    public: bool,
}

impl AuditorBuilder {
    /// Creates a new `AuditorBuilder` with the given storage configuration
    /// and default scan options.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            options: ScanOptions::default(),
            public: false,
        }
    }

    /// Objects last modified more than `days` days ago are reported stale.
    pub fn with_days_stale(mut self, days: u32) -> Self {
        self.options = self.options.with_days_stale(days);
        self
    }

    /// Flag objects larger than `mb` MiB. `0` disables the check.
    pub fn with_oversize_mb(mut self, mb: f64) -> Self {
        self.options = self.options.with_oversize_mb(mb);
        self
    }

    /// Stop after `limit` objects. `0` means no limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.options = self.options.with_limit(limit);
        self
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Probe the known keys of a public bucket anonymously instead of listing.
    ///
    /// This is a degraded mode; see [`crate::storage::public`].
    pub fn with_public_access(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Builds the `Auditor` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the source cannot be
    /// created (missing backend, bad configuration, unregistered public
    /// bucket, missing local directory).
    pub async fn build(self) -> AuditResult<Auditor> {
        self.options.validate()?;
        let source = SourceFactory::from_config(self.config, self.public)?;
        Ok(Auditor {
            source,
            options: self.options,
        })
    }
}

/// Scans one storage container for stale, oversized, and duplicated objects.
///
/// # Examples
///
/// ```no_run
/// use cloud_audit::{Auditor, StorageConfig};
///
/// # async fn example() -> Result<(), cloud_audit::AuditError> {
/// let config = StorageConfig::local().with_option("path", "./data");
/// let auditor = Auditor::builder(config).build().await?;
///
/// let records = auditor.scan().await?;
/// println!("{} objects in {}", records.len(), auditor.base_uri());
/// # Ok(())
/// # }
/// ```
pub struct Auditor {
    source: Arc<dyn ObjectSource>,
    options: ScanOptions,
}

impl Auditor {
    pub fn builder(config: StorageConfig) -> AuditorBuilder {
        AuditorBuilder::new(config)
    }

    /// Audit an existing source, e.g. a [`crate::storage::MemorySource`].
    pub fn from_source(source: Arc<dyn ObjectSource>, options: ScanOptions) -> AuditResult<Self> {
        options.validate()?;
        Ok(Self { source, options })
    }

    pub fn base_uri(&self) -> &str {
        self.source.base_uri()
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Run one scan to completion.
    pub async fn scan(&self) -> AuditResult<Vec<ObjectRecord>> {
        self.scan_with_cancellation(&CancellationToken::new()).await
    }

    /// Run one scan, failing with `Cancelled` once `cancel` fires.
    pub async fn scan_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> AuditResult<Vec<ObjectRecord>> {
        measure_dur_async(
            "scan_dur",
            || pipeline::scan_at(self.source.as_ref(), &self.options, Utc::now(), cancel),
            Some(|records: &Vec<ObjectRecord>| format!("count={}", records.len())),
        )
        .await
    }
}
