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

//! Raw storage failures and their translation into [`AuditError`].
//!
//! This is the only place that inspects `object_store` errors. Everything
//! leaving the `storage` module is an [`AuditError`].

use crate::audit::error::AuditError;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

// Status tokens carry their reason phrase so ids like `RequestId>A404B` never match.
const DENIED_MARKERS: &[&str] = &[
    "AccessDenied",
    "AuthorizationFailure",
    "AuthenticationFailed",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "401 Unauthorized",
    "403 Forbidden",
    "status code: 401",
    "status code: 403",
];

const NOT_FOUND_MARKERS: &[&str] = &[
    "NoSuchBucket",
    "ContainerNotFound",
    "BucketNotFound",
    "404 Not Found",
    "status code: 404",
];

impl StorageError {
    /// Translate into the provider-agnostic taxonomy.
    pub fn into_audit_error(self, container: &str) -> AuditError {
        match self {
            StorageError::ConfigError(message) => AuditError::InvalidConfiguration(message),
            StorageError::UrlParseError(e) => {
                AuditError::InvalidConfiguration(format!("Invalid URL: {}", e))
            }
            StorageError::IoError(e) => match e.kind() {
                std::io::ErrorKind::NotFound => AuditError::ContainerNotFound {
                    container: container.to_string(),
                },
                std::io::ErrorKind::PermissionDenied => AuditError::AuthorizationDenied {
                    container: container.to_string(),
                    message: e.to_string(),
                },
                _ => AuditError::NetworkUnavailable {
                    container: container.to_string(),
                    message: e.to_string(),
                },
            },
            StorageError::ObjectStoreError(e) => translate_object_store(e, container),
        }
    }
}

fn translate_object_store(error: object_store::Error, container: &str) -> AuditError {
    use object_store::Error;

    match error {
        Error::NotFound { .. } => AuditError::ContainerNotFound {
            container: container.to_string(),
        },
        Error::PermissionDenied { source, .. } | Error::Unauthenticated { source, .. } => {
            AuditError::AuthorizationDenied {
                container: container.to_string(),
                message: source.to_string(),
            }
        }
        Error::NotSupported { source } => AuditError::Unsupported(source.to_string()),
        Error::NotImplemented => {
            AuditError::Unsupported("operation not implemented by this store".to_string())
        }
        Error::UnknownConfigurationKey { store, key } => AuditError::InvalidConfiguration(
            format!("Unknown {} configuration key: {}", store, key),
        ),
        Error::InvalidPath { source } => {
            AuditError::InvalidConfiguration(format!("Invalid path: {}", source))
        }
        other => classify_message(other.to_string(), container),
    }
}

// Generic store errors only carry the HTTP response text, so sniff it.
// Denied wins over not-found: a 403 body may still name a missing resource.
fn classify_message(message: String, container: &str) -> AuditError {
    if DENIED_MARKERS.iter().any(|m| message.contains(m)) {
        AuditError::AuthorizationDenied {
            container: container.to_string(),
            message,
        }
    } else if NOT_FOUND_MARKERS.iter().any(|m| message.contains(m)) {
        AuditError::ContainerNotFound {
            container: container.to_string(),
        }
    } else {
        AuditError::NetworkUnavailable {
            container: container.to_string(),
            message,
        }
    }
}
