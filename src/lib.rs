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

//! # Cloud Audit
//!
//! A Rust library for auditing object storage containers across cloud providers.
//!
//! Cloud Audit enumerates the objects of one bucket, container, or directory and
//! classifies each of them: stale (not modified for a number of days), oversized
//! (above a size threshold), and duplicate (same size and modification time as
//! another object). Results can be written as HTML, CSV, or JSON reports.
//!
//! ## Features
//!
//! - **Cloud storage**: AWS S3, Azure Blob Storage, Google Cloud Storage, Local filesystem
//! - **Provider-agnostic core**: Any [`storage::ObjectSource`] can be scanned
//! - **Deterministic classification**: One captured instant per scan, whole-second precision
//! - **Linear duplicate grouping**: Metadata fingerprints, no content hashing
//! - **Reports**: HTML, CSV, JSON, and a terminal summary
//!
//! ## Quick Start
//!
//! ### Local Filesystem Example
//!
//! ```rust,no_run
//! use cloud_audit::{Auditor, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! // Configure storage for local filesystem
//! let config = StorageConfig::local()
//!     .with_option("path", "./data");
//!
//! // Create auditor
//! let auditor = Auditor::builder(config)
//!     .with_days_stale(90)
//!     .build()
//!     .await?;
//!
//! // Scan and write a report
//! let records = auditor.scan().await?;
//! cloud_audit::report::save_report(
//!     &records,
//!     std::path::Path::new("report.html"),
//!     cloud_audit::report::ReportFormat::Html,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ### AWS S3 Example
//!
//! ```rust,no_run
//! use cloud_audit::{Auditor, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = StorageConfig::aws()
//!     .with_option("bucket", "my-bucket")
//!     .with_option("region", "us-east-1");
//!
//! let auditor = Auditor::builder(config)
//!     .with_oversize_mb(1024.0)
//!     .with_limit(10_000)
//!     .build()
//!     .await?;
//! let records = auditor.scan().await?;
//! println!("{}", cloud_audit::AuditSummary::from_records(auditor.base_uri(), &records));
//! # Ok(())
//! # }
//! ```
//!
//! ### Scanning metadata you already hold
//!
//! ```rust
//! use cloud_audit::audit::pipeline::scan;
//! use cloud_audit::storage::MemorySource;
//! use cloud_audit::ScanOptions;
//! use chrono::Utc;
//!
//! # async fn example() -> Result<(), cloud_audit::AuditError> {
//! let now = Utc::now();
//! let source = MemorySource::new("s3://bucket")
//!     .with_object("a.bin", 4096, now)
//!     .with_object("b.bin", 4096, now);
//!
//! let records = scan(&source, &ScanOptions::default()).await?;
//! assert_eq!(records[0].duplicate_id, records[1].duplicate_id);
//! # Ok(())
//! # }
//! ```
//!
//! For more examples, see the `demos/` directory.
//!
//! ## Modules
//!
//! - [`audit`] - Scan pipeline, classification, and duplicate grouping
//! - [`storage`] - Object sources and provider configuration
//! - [`report`] - Report normalization and writers
//! - [`util`] - Utility functions and helpers

pub mod audit;
pub mod report;
pub mod storage;
pub mod util;

// Re-export commonly used types
pub use audit::options::DEFAULT_DAYS_STALE;
pub use audit::{AuditError, AuditResult, Auditor, ErrorKind, ObjectRecord, ScanOptions, Status};
pub use report::AuditSummary;
pub use storage::{StorageConfig, StorageType};
