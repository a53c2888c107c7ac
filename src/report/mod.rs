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

//! Report generation
//!
//! Scan records are normalized (status backfill, stable column order) and
//! written as HTML, CSV, or JSON.
//!
//! ## Modules
//!
//! - [`normalize`] - Status priority and column ordering
//! - [`html`], [`csv`], [`json`] - Report writers
//! - [`summary`] - Terminal summary

pub mod csv;
pub mod html;
pub mod json;
pub mod normalize;
pub mod summary;

pub use normalize::NormalizedReport;
pub use summary::AuditSummary;

use crate::audit::record::ObjectRecord;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Error types for report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    /// Infer the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> ReportResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension
            .parse()
            .map_err(|_| ReportError::UnsupportedFormat(format!("extension '.{}'", extension)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(ReportFormat::Html),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Render `records` in `format`.
pub fn render_report(records: &[ObjectRecord], format: ReportFormat) -> ReportResult<String> {
    let report = NormalizedReport::from_records(records)?;
    match format {
        ReportFormat::Html => Ok(html::render(&report)),
        ReportFormat::Csv => Ok(csv::render(&report)),
        ReportFormat::Json => json::render(&report),
    }
}

/// Write a report for `records` to `path`.
pub fn save_report(records: &[ObjectRecord], path: &Path, format: ReportFormat) -> ReportResult<()> {
    let content = render_report(records, format)?;
    std::fs::write(path, content)?;
    info!(
        "Wrote report format={}, rows={}, path={}",
        format,
        records.len(),
        path.display()
    );
    Ok(())
}
