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

use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Failures that abort a scan.
///
/// Every variant is provider-agnostic. Vendor errors are translated into one
/// of these at the source boundary (see [`crate::storage::error`]) and are
/// never matched on inside the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("Access denied to '{container}': {message}")]
    AuthorizationDenied { container: String, message: String },

    #[error("Container '{container}' not found or inaccessible")]
    ContainerNotFound { container: String },

    #[error("Network error while listing '{container}': {message}")]
    NetworkUnavailable { container: String, message: String },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Malformed record '{path}': {reason}")]
    MalformedRecord { path: String, reason: String },

    #[error("Provider '{provider}' is not available in this build")]
    ProviderUnavailable { provider: String, feature: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Scan cancelled")]
    Cancelled,
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

/// Taxonomy kind of an [`AuditError`], shown to users instead of raw errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AuthorizationDenied,
    ContainerNotFound,
    NetworkUnavailable,
    Unsupported,
    MalformedRecord,
    ProviderUnavailable,
    InvalidConfiguration,
    Cancelled,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            ErrorKind::AuthorizationDenied => "AuthorizationDenied",
            ErrorKind::ContainerNotFound => "ContainerNotFound",
            ErrorKind::NetworkUnavailable => "NetworkUnavailable",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::MalformedRecord => "MalformedRecord",
            ErrorKind::ProviderUnavailable => "ProviderUnavailable",
            ErrorKind::InvalidConfiguration => "InvalidConfiguration",
            ErrorKind::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

impl AuditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuditError::AuthorizationDenied { .. } => ErrorKind::AuthorizationDenied,
            AuditError::ContainerNotFound { .. } => ErrorKind::ContainerNotFound,
            AuditError::NetworkUnavailable { .. } => ErrorKind::NetworkUnavailable,
            AuditError::Unsupported(_) => ErrorKind::Unsupported,
            AuditError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            AuditError::ProviderUnavailable { .. } => ErrorKind::ProviderUnavailable,
            AuditError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            AuditError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// One-line remediation for the user.
    pub fn hint(&self) -> String {
        match self {
            AuditError::AuthorizationDenied { .. } => {
                "Check credentials and bucket permissions; a public bucket may still forbid listing."
                    .to_string()
            }
            AuditError::ContainerNotFound { .. } => {
                "Verify the bucket or container name and the account/region it lives in.".to_string()
            }
            AuditError::NetworkUnavailable { .. } => {
                "Check connectivity and retry the scan.".to_string()
            }
            AuditError::Unsupported(_) => {
                "Use credentials with list permission instead of public mode.".to_string()
            }
            AuditError::MalformedRecord { .. } => {
                "The storage backend returned incomplete metadata; report this provider bug."
                    .to_string()
            }
            AuditError::ProviderUnavailable { feature, .. } => {
                format!("Rebuild with `cargo install cloud-audit --features {}`.", feature)
            }
            AuditError::InvalidConfiguration(_) => {
                "Review the --option values and scan parameters.".to_string()
            }
            AuditError::Cancelled => "The scan was interrupted; no report was written.".to_string(),
        }
    }

    /// Whether a source may retry the failed operation.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuditError::NetworkUnavailable { .. })
    }
}
