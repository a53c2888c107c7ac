// Copyright 2022 Adobe. All rights reserved.
// This file is licensed to you under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may obtain a copy
// of the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under
// the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR REPRESENTATIONS
// OF ANY KIND, either express or implied. See the License for the specific language
// governing permissions and limitations under the License.

use super::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage provider type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Local filesystem storage
    Local,
    /// AWS S3 storage
    Aws,
    /// Azure Blob Storage
    Azure,
    /// Google Cloud Storage
    Gcs,
}

impl StorageType {
    /// Cargo feature that compiles in the backend for this provider.
    pub fn cargo_feature(&self) -> Option<&'static str> {
        match self {
            StorageType::Local => None,
            StorageType::Aws => Some("aws"),
            StorageType::Azure => Some("azure"),
            StorageType::Gcs => Some("gcp"),
        }
    }

    /// URI scheme used when rendering object paths.
    pub fn scheme(&self) -> &'static str {
        match self {
            StorageType::Local => "file",
            StorageType::Aws => "s3",
            StorageType::Azure => "az",
            StorageType::Gcs => "gs",
        }
    }

    /// Option key that names the container for this provider.
    pub fn container_key(&self) -> &'static str {
        match self {
            StorageType::Local => "path",
            StorageType::Aws | StorageType::Gcs => "bucket",
            StorageType::Azure => "container",
        }
    }
}

impl FromStr for StorageType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "file" => Ok(StorageType::Local),
            "aws" | "s3" => Ok(StorageType::Aws),
            "azure" | "az" => Ok(StorageType::Azure),
            "gcs" | "gcp" | "gs" => Ok(StorageType::Gcs),
            _ => Err(StorageError::ConfigError(format!(
                "Unknown storage type: {} (expected one of aws, gcs, azure, local)",
                s
            ))),
        }
    }
}

impl Display for StorageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            StorageType::Local => "local",
            StorageType::Aws => "aws",
            StorageType::Azure => "azure",
            StorageType::Gcs => "gcs",
        })
    }
}

/// Generic configuration for storage sources using object_store
///
/// Provider-specific options live in a string map and are applied to the
/// object_store builders, so adding a provider option does not require a new
/// config struct.
///
/// # Examples
///
/// ## Local filesystem
/// ```
/// use cloud_audit::storage::StorageConfig;
///
/// let config = StorageConfig::local()
///     .with_option("path", "/tmp/data");
/// ```
///
/// ## AWS S3
/// ```
/// use cloud_audit::storage::StorageConfig;
///
/// let config = StorageConfig::parse("s3")
///     .unwrap()
///     .with_option("bucket", "my-bucket")
///     .with_option("region", "us-east-1");
/// ```
///
/// ## Azure
/// ```
/// use cloud_audit::storage::StorageConfig;
///
/// let config = StorageConfig::azure()
///     .with_option("container", "mycontainer")
///     .with_option("account_name", "myaccount")
///     .with_option("access_key", "ACCOUNT_KEY");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider type
    #[serde(rename = "type")]
    pub storage_type: StorageType,

    /// Provider-specific configuration options
    ///
    /// All providers:
    /// - prefix: Only scan keys below this prefix
    /// - timeout, connect_timeout, max_retries, retry_timeout,
    ///   pool_idle_timeout, pool_max_idle_per_host: HTTP client tuning
    ///
    /// AWS S3:
    /// - bucket, region, access_key_id, secret_access_key, session_token,
    ///   endpoint, allow_http
    ///
    /// Azure:
    /// - container, account_name, access_key, sas_token, tenant_id,
    ///   client_id, client_secret, endpoint
    /// - container_url: `https://<account>.blob.core.windows.net/<container>[?SAS]`
    /// - connection_string: `AccountName=..;AccountKey=..` (falls back to
    ///   `AZURE_STORAGE_CONNECTION_STRING`)
    ///
    /// GCS:
    /// - bucket, service_account_key_path, service_account_key
    ///
    /// Local:
    /// - path: Directory to scan
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl StorageConfig {
    /// Create a configuration from a provider name such as `"s3"` or `"gcs"`.
    pub fn parse(storage_type: &str) -> StorageResult<Self> {
        Ok(Self::of_type(storage_type.parse()?))
    }

    pub fn of_type(storage_type: StorageType) -> Self {
        Self {
            storage_type,
            options: Self::default_options(),
        }
    }

    /// Configuration targeting one container, the common CLI case.
    ///
    /// For Azure, a value starting with `https://` is taken as a container URL.
    pub fn for_container(storage_type: StorageType, container: &str) -> Self {
        Self::of_type(storage_type).with_container(container)
    }

    /// Set the container option appropriate for this provider.
    pub fn with_container(self, container: &str) -> Self {
        let key = if self.storage_type == StorageType::Azure && container.starts_with("https://") {
            "container_url"
        } else {
            self.storage_type.container_key()
        };
        self.with_option(key, container)
    }

    pub fn local() -> Self {
        Self::of_type(StorageType::Local)
    }

    pub fn aws() -> Self {
        Self::of_type(StorageType::Aws)
    }

    pub fn azure() -> Self {
        Self::of_type(StorageType::Azure)
    }

    pub fn gcs() -> Self {
        Self::of_type(StorageType::Gcs)
    }

    /// Default timeout, retry, and connection pool settings.
    pub fn default_options() -> HashMap<String, String> {
        [
            ("timeout", "1200"),
            ("connect_timeout", "30"),
            ("max_retries", "10"),
            ("retry_timeout", "300"),
            ("pool_idle_timeout", "15"),
            ("pool_max_idle_per_host", "5"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    /// Key prefix to scan below, without leading or trailing slashes.
    pub fn prefix(&self) -> Option<&str> {
        self.get_option("prefix")
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
    }

    pub fn storage_type_str(&self) -> &str {
        match self.storage_type {
            StorageType::Local => "local",
            StorageType::Aws => "aws",
            StorageType::Azure => "azure",
            StorageType::Gcs => "gcs",
        }
    }

    /// Human-readable container name used in error messages.
    pub fn container_label(&self) -> String {
        self.get_option(self.storage_type.container_key())
            .or_else(|| self.get_option("container_url"))
            .cloned()
            .unwrap_or_else(|| format!("<{} container>", self.storage_type))
    }
}

/// Parse a `KEY=VALUE` pair as given on the command line.
pub fn parse_option_pair(pair: &str) -> StorageResult<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(StorageError::ConfigError(format!(
            "Expected KEY=VALUE, got '{}'",
            pair
        ))),
    }
}
