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

use super::config::{StorageConfig, StorageType};
use super::error::{StorageError, StorageResult};
use super::provider::{join_uri, prefix_to_path, ObjectSource};
use crate::audit::error::{AuditError, AuditResult};
use crate::audit::record::RawObject;
use futures::stream::{BoxStream, StreamExt};
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(feature = "cloud")]
use object_store::{ClientOptions, RetryConfig};
#[cfg(feature = "cloud")]
use std::time::Duration;

#[cfg(feature = "aws")]
use object_store::aws::AmazonS3Builder;
#[cfg(feature = "azure")]
use object_store::azure::MicrosoftAzureBuilder;
#[cfg(feature = "gcp")]
use object_store::gcp::GoogleCloudStorageBuilder;

/// Environment variable holding an Azure storage connection string.
pub const AZURE_CONNECTION_STRING_ENV: &str = "AZURE_STORAGE_CONNECTION_STRING";

// Options consumed by `build_connection_options` / `build_retry_options`.
const CLIENT_OPTION_KEYS: &[&str] = &[
    "timeout",
    "connect_timeout",
    "max_retries",
    "retry_timeout",
    "pool_idle_timeout",
    "pool_max_idle_per_host",
    "prefix",
];

/// Listing source backed by any object_store backend (S3, Azure, GCS, local).
pub struct ObjectStoreSource {
    config: StorageConfig,
    store: Arc<dyn ObjectStore>,
    base_uri: String,
    prefix: Option<ObjectPath>,
    container: String,
}

impl ObjectStoreSource {
    /// Create a listing source from configuration.
    ///
    /// # Errors
    ///
    /// * `ProviderUnavailable` - The provider's backend was not compiled in
    /// * `InvalidConfiguration` - Required options are missing or invalid
    /// * `ContainerNotFound` - A local path does not exist
    pub fn new(config: StorageConfig) -> AuditResult<Self> {
        let container = config.container_label();
        if !Self::provider_compiled(config.storage_type) {
            return Err(AuditError::ProviderUnavailable {
                provider: config.storage_type.to_string(),
                feature: config
                    .storage_type
                    .cargo_feature()
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        let (store, base_uri) =
            Self::build_store(&config).map_err(|e| e.into_audit_error(&container))?;
        let prefix = prefix_to_path(config.prefix());

        info!(
            "Created listing source type={}, location={}, prefix={:?}",
            config.storage_type_str(),
            base_uri,
            config.prefix()
        );

        Ok(Self {
            config,
            store: Arc::from(store),
            base_uri,
            prefix,
            container,
        })
    }

    /// Wrap an already-built store, e.g. `object_store::memory::InMemory`.
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        storage_type: StorageType,
        base_uri: impl Into<String>,
    ) -> Self {
        let base_uri = base_uri.into();
        Self {
            config: StorageConfig::of_type(storage_type),
            store,
            container: base_uri.clone(),
            base_uri,
            prefix: None,
        }
    }

    /// Whether the backend for `storage_type` is part of this build.
    pub fn provider_compiled(storage_type: StorageType) -> bool {
        match storage_type {
            StorageType::Local => true,
            StorageType::Aws => cfg!(feature = "aws"),
            StorageType::Azure => cfg!(feature = "azure"),
            StorageType::Gcs => cfg!(feature = "gcp"),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    #[allow(unreachable_patterns)]
    fn build_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        match config.storage_type {
            StorageType::Local => Self::build_local_store(config),
            #[cfg(feature = "aws")]
            StorageType::Aws => Self::build_aws_store(config),
            #[cfg(feature = "azure")]
            StorageType::Azure => Self::build_azure_store(config),
            #[cfg(feature = "gcp")]
            StorageType::Gcs => Self::build_gcs_store(config),
            other => Err(StorageError::ConfigError(format!(
                "Storage type {} is not compiled in",
                other
            ))),
        }
    }

    /// Build a local filesystem store rooted at the `path` option.
    ///
    /// # Errors
    ///
    /// * The 'path' option is missing from configuration
    /// * The path cannot be canonicalized (doesn't exist or permission denied)
    /// * The path is not a directory
    fn build_local_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let path = config.get_option("path").ok_or_else(|| {
            StorageError::ConfigError("Local storage requires 'path' option".to_string())
        })?;

        // Missing directories surface as io::ErrorKind::NotFound, i.e. ContainerNotFound
        let canonical_path = PathBuf::from(path).canonicalize()?;

        if !canonical_path.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "Base path is not a directory: {}",
                canonical_path.display()
            )));
        }

        let store = LocalFileSystem::new_with_prefix(&canonical_path).map_err(|e| {
            StorageError::ConfigError(format!("Failed to create local store: {}", e))
        })?;

        let base_uri = local_base_uri(&canonical_path.to_string_lossy());
        Ok((Box::new(store), base_uri))
    }

    /// Build connection options from the `timeout`, `connect_timeout` and pool settings.
    #[cfg(feature = "cloud")]
    pub(crate) fn build_connection_options(config: &StorageConfig) -> ClientOptions {
        let mut client_options = ClientOptions::default();
        if let Some(timeout_str) = config.options.get("timeout") {
            if timeout_str == "0" || timeout_str == "disabled" {
                client_options = client_options.with_timeout_disabled();
            } else if let Ok(sec) = timeout_str.parse::<u64>() {
                client_options = client_options.with_timeout(Duration::from_secs(sec))
            }
        };
        if let Some(connect_timeout_str) = config.options.get("connect_timeout") {
            if connect_timeout_str == "0" || connect_timeout_str == "disabled" {
                client_options = client_options.with_connect_timeout_disabled();
            } else if let Ok(sec) = connect_timeout_str.parse::<u64>() {
                client_options = client_options.with_connect_timeout(Duration::from_secs(sec))
            }
        }
        if let Some(pool_idle_timeout_str) = config.options.get("pool_idle_timeout") {
            if let Ok(sec) = pool_idle_timeout_str.parse::<u64>() {
                client_options = client_options.with_pool_idle_timeout(Duration::from_secs(sec))
            }
        }
        if let Some(pool_max_idle_per_host_str) = config.options.get("pool_max_idle_per_host") {
            if let Ok(max_idle) = pool_max_idle_per_host_str.parse::<usize>() {
                client_options = client_options.with_pool_max_idle_per_host(max_idle)
            }
        }
        client_options
    }

    /// Build the HTTP retry policy applied by object_store to every request.
    #[cfg(feature = "cloud")]
    pub(crate) fn build_retry_options(config: &StorageConfig) -> RetryConfig {
        let default_retry_config = RetryConfig::default();
        let max_retries = config
            .options
            .get("max_retries")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(default_retry_config.max_retries);
        let retry_timeout = config
            .options
            .get("retry_timeout")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(default_retry_config.retry_timeout);
        RetryConfig {
            backoff: Default::default(),
            max_retries,
            retry_timeout,
        }
    }

    /// Build an AWS S3 store. Credentials not given as options are read from `AWS_*`.
    #[cfg(feature = "aws")]
    fn build_aws_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let mut builder = AmazonS3Builder::from_env()
            .with_client_options(Self::build_connection_options(config))
            .with_retry(Self::build_retry_options(config));
        let bucket = config.get_option("bucket").ok_or_else(|| {
            StorageError::ConfigError("AWS S3 requires 'bucket' option".to_string())
        })?;

        for (key, value) in &config.options {
            match key.as_str() {
                "bucket" => builder = builder.with_bucket_name(value),
                "region" => builder = builder.with_region(value),
                "access_key_id" => builder = builder.with_access_key_id(value),
                "secret_access_key" => builder = builder.with_secret_access_key(value),
                "session_token" | "token" => builder = builder.with_token(value),
                "endpoint" => builder = builder.with_endpoint(value),
                "allow_http" => builder = builder.with_allow_http(value.to_lowercase() == "true"),
                k if CLIENT_OPTION_KEYS.contains(&k) => (),
                _ => tracing::warn!("Unknown AWS S3 option: {}", key),
            }
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create S3 store: {}", e)))?;

        Ok((Box::new(store), format!("s3://{}", bucket)))
    }

    /// Build an Azure Blob store.
    ///
    /// Settings are layered: connection string, then container URL, then
    /// explicit options, each overriding the previous.
    #[cfg(feature = "azure")]
    fn build_azure_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let mut builder = MicrosoftAzureBuilder::from_env()
            .with_client_options(Self::build_connection_options(config))
            .with_retry(Self::build_retry_options(config));
        let mut container: Option<String> = None;

        let connection_string = config
            .get_option("connection_string")
            .cloned()
            .or_else(|| std::env::var(AZURE_CONNECTION_STRING_ENV).ok());
        if let Some(raw) = connection_string {
            let parsed = AzureConnectionString::parse(&raw)?;
            if let Some(account) = parsed.account_name {
                builder = builder.with_account(account);
            }
            if let Some(key) = parsed.account_key {
                builder = builder.with_access_key(key);
            }
            if let Some(endpoint) = parsed.blob_endpoint {
                builder = builder
                    .with_endpoint(endpoint.clone())
                    .with_allow_http(endpoint.starts_with("http://"));
            }
            if let Some(sas) = parsed.shared_access_signature {
                builder = builder.with_sas_authorization(parse_sas_pairs(&sas));
            }
        }

        if let Some(url) = config.get_option("container_url") {
            let target = AzureContainerUrl::parse(url)?;
            builder = builder
                .with_account(target.account.clone())
                .with_container_name(target.container.clone());
            if !target.sas.is_empty() {
                builder = builder.with_sas_authorization(target.sas);
            }
            container = Some(target.container);
        }

        for (key, value) in &config.options {
            match key.as_str() {
                "container" => {
                    container = Some(value.clone());
                    builder = builder.with_container_name(value)
                }
                "account_name" => builder = builder.with_account(value),
                "access_key" | "account_key" => builder = builder.with_access_key(value),
                "sas_token" => builder = builder.with_sas_authorization(parse_sas_pairs(value)),
                "tenant_id" => builder = builder.with_tenant_id(value),
                "client_id" => builder = builder.with_client_id(value),
                "client_secret" => builder = builder.with_client_secret(value),
                "endpoint" => builder = builder.with_endpoint(value.clone()),
                "container_url" | "connection_string" => (),
                k if CLIENT_OPTION_KEYS.contains(&k) => (),
                _ => tracing::warn!("Unknown Azure option: {}", key),
            }
        }

        let container = container.ok_or_else(|| {
            StorageError::ConfigError(
                "Azure requires a 'container' option or a container URL".to_string(),
            )
        })?;

        let store = builder.build().map_err(|e| {
            StorageError::ConfigError(format!("Failed to create Azure store: {}", e))
        })?;

        Ok((Box::new(store), format!("az://{}", container)))
    }

    /// Build a GCS store. Credentials not given as options are read from `GOOGLE_*`.
    #[cfg(feature = "gcp")]
    fn build_gcs_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let mut builder = GoogleCloudStorageBuilder::from_env()
            .with_client_options(Self::build_connection_options(config))
            .with_retry(Self::build_retry_options(config));
        let bucket = config.get_option("bucket").ok_or_else(|| {
            StorageError::ConfigError("GCS requires 'bucket' option".to_string())
        })?;

        for (key, value) in &config.options {
            match key.as_str() {
                "bucket" => builder = builder.with_bucket_name(value),
                "service_account_key_path" => builder = builder.with_service_account_path(value),
                "service_account_key" => builder = builder.with_service_account_key(value),
                k if CLIENT_OPTION_KEYS.contains(&k) => (),
                _ => tracing::warn!("Unknown GCS option: {}", key),
            }
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create GCS store: {}", e)))?;

        Ok((Box::new(store), format!("gs://{}", bucket)))
    }
}

impl ObjectSource for ObjectStoreSource {
    fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn objects(&self, limit: Option<usize>) -> BoxStream<'_, AuditResult<RawObject>> {
        debug!(
            "Listing location={}, prefix={:?}, limit={:?}",
            self.base_uri, self.prefix, limit
        );

        let base_uri = self.base_uri.as_str();
        let container = self.container.as_str();
        let listing = self.store.list(self.prefix.as_ref()).map(move |result| {
            result
                .map(|meta| RawObject {
                    path: join_uri(base_uri, meta.location.as_ref()),
                    size: meta.size,
                    last_modified: Some(meta.last_modified),
                })
                .map_err(|e| StorageError::from(e).into_audit_error(container))
        });

        // `take` stops polling the paginated listing, so no further pages are requested
        match limit {
            Some(n) => listing.take(n).boxed(),
            None => listing.boxed(),
        }
    }
}

impl Debug for ObjectStoreSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ObjectStoreSource(type={}, location={}, prefix={:?})",
            self.config.storage_type_str(),
            self.base_uri,
            self.prefix
        )
    }
}

/// Render a canonical local directory as a `file:///` URI.
fn local_base_uri(path: &str) -> String {
    // Normalize Windows separators and the extended-length prefix added by canonicalize()
    let path = path.replace('\\', "/");
    let path = path.strip_prefix("//?/").unwrap_or(&path);
    format!("file:///{}", path.trim_start_matches('/').trim_end_matches('/'))
}

/// Split a SAS query string into percent-decoded key/value pairs.
///
/// object_store encodes the pairs again when signing, so they must not be
/// passed through still encoded.
#[cfg_attr(not(feature = "azure"), allow(dead_code))]
fn parse_sas_pairs(sas: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(sas.trim_start_matches('?').as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// `https://<account>.blob.core.windows.net/<container>[?SAS]`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(not(feature = "azure"), allow(dead_code))]
struct AzureContainerUrl {
    account: String,
    container: String,
    sas: Vec<(String, String)>,
}

#[cfg_attr(not(feature = "azure"), allow(dead_code))]
impl AzureContainerUrl {
    fn parse(raw: &str) -> StorageResult<Self> {
        let url = url::Url::parse(raw)?;
        let host = url
            .host_str()
            .ok_or_else(|| StorageError::ConfigError(format!("Container URL has no host: {}", raw)))?;
        let account = host
            .split('.')
            .next()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                StorageError::ConfigError(format!("Cannot derive account from host: {}", host))
            })?
            .to_string();
        let container = url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                StorageError::ConfigError(format!("Container URL has no container: {}", raw))
            })?
            .to_string();
        let sas = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            account,
            container,
            sas,
        })
    }
}

/// The subset of an Azure storage connection string used for blob listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(not(feature = "azure"), allow(dead_code))]
struct AzureConnectionString {
    account_name: Option<String>,
    account_key: Option<String>,
    blob_endpoint: Option<String>,
    shared_access_signature: Option<String>,
}

#[cfg_attr(not(feature = "azure"), allow(dead_code))]
impl AzureConnectionString {
    fn parse(raw: &str) -> StorageResult<Self> {
        let mut parsed = Self::default();
        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                StorageError::ConfigError(format!("Malformed connection string segment: {}", part))
            })?;
            match key {
                "AccountName" => parsed.account_name = Some(value.to_string()),
                "AccountKey" => parsed.account_key = Some(value.to_string()),
                "BlobEndpoint" => parsed.blob_endpoint = Some(value.to_string()),
                "SharedAccessSignature" => {
                    parsed.shared_access_signature = Some(value.to_string())
                }
                _ => (),
            }
        }

        if parsed.account_name.is_none() && parsed.blob_endpoint.is_none() {
            return Err(StorageError::ConfigError(
                "Connection string needs AccountName or BlobEndpoint".to_string(),
            ));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::error::ErrorKind;
    use futures::TryStreamExt;
    use std::fs;
    use tempfile::TempDir;

    fn local_source(dir: &TempDir) -> ObjectStoreSource {
        let config = StorageConfig::local().with_option("path", dir.path().to_str().unwrap());
        ObjectStoreSource::new(config).unwrap()
    }

    #[cfg(feature = "cloud")]
    #[test]
    fn test_build_connection_options_does_not_panic() {
        let config = StorageConfig::local()
            .with_option("timeout", "disabled")
            .with_option("connect_timeout", "0")
            .with_option("pool_max_idle_per_host", "not_a_number");
        let _options = ObjectStoreSource::build_connection_options(&config);
    }

    #[cfg(feature = "cloud")]
    #[test]
    fn test_build_retry_options() {
        let config = StorageConfig::local()
            .with_option("max_retries", "5")
            .with_option("retry_timeout", "300");
        let retry_config = ObjectStoreSource::build_retry_options(&config);
        assert_eq!(retry_config.max_retries, 5);
        assert_eq!(retry_config.retry_timeout, Duration::from_secs(300));

        let config = StorageConfig::local()
            .with_option("max_retries", "invalid")
            .with_option("retry_timeout", "not_a_number");
        let retry_config = ObjectStoreSource::build_retry_options(&config);
        assert_eq!(retry_config.max_retries, RetryConfig::default().max_retries);
    }

    #[tokio::test]
    async fn test_local_listing_yields_file_uris() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("b.bin"), vec![0u8; 32]).unwrap();

        let source = local_source(&temp_dir);
        assert!(source.base_uri().starts_with("file:///"));

        let mut objects: Vec<RawObject> = source.objects(None).try_collect().await.unwrap();
        objects.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(objects.len(), 2);
        assert!(objects[0].path.ends_with("/a.txt"));
        assert_eq!(objects[0].size, 5);
        assert!(objects[1].path.ends_with("/nested/b.bin"));
        assert_eq!(objects[1].size, 32);
        assert!(objects.iter().all(|o| o.last_modified.is_some()));
        assert!(objects
            .iter()
            .all(|o| o.path.starts_with(source.base_uri())));
    }

    #[tokio::test]
    async fn test_local_listing_respects_limit() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..5 {
            fs::write(temp_dir.path().join(format!("f{}.txt", i)), b"x").unwrap();
        }

        let source = local_source(&temp_dir);
        let objects: Vec<RawObject> = source.objects(Some(2)).try_collect().await.unwrap();
        assert_eq!(objects.len(), 2);
    }

    #[tokio::test]
    async fn test_local_prefix_option() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("keep")).unwrap();
        fs::write(temp_dir.path().join("keep").join("x"), b"1").unwrap();
        fs::write(temp_dir.path().join("skip"), b"2").unwrap();

        let config = StorageConfig::local()
            .with_option("path", temp_dir.path().to_str().unwrap())
            .with_option("prefix", "keep/");
        let source = ObjectStoreSource::new(config).unwrap();
        let objects: Vec<RawObject> = source.objects(None).try_collect().await.unwrap();

        assert_eq!(objects.len(), 1);
        assert!(objects[0].path.ends_with("/keep/x"));
    }

    #[test]
    fn test_local_missing_path_option() {
        let err = ObjectStoreSource::new(StorageConfig::local()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_local_nonexistent_directory_is_not_found() {
        let config = StorageConfig::local().with_option("path", "/nonexistent/invalid/path");
        let err = ObjectStoreSource::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContainerNotFound);
    }

    #[test]
    fn test_local_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test_file.txt");
        fs::write(&file_path, "test content").unwrap();

        let config = StorageConfig::local().with_option("path", file_path.to_str().unwrap());
        match ObjectStoreSource::new(config) {
            Err(AuditError::InvalidConfiguration(msg)) => assert!(msg.contains("not a directory")),
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_from_store_in_memory() {
        use object_store::memory::InMemory;
        use object_store::PutPayload;

        let store = Arc::new(InMemory::new());
        store
            .put(&ObjectPath::from("dir/one"), PutPayload::from_static(b"abc"))
            .await
            .unwrap();

        let source = ObjectStoreSource::from_store(store, StorageType::Aws, "s3://mem");
        let objects: Vec<RawObject> = source.objects(None).try_collect().await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].path, "s3://mem/dir/one");
        assert_eq!(objects[0].size, 3);
    }

    #[test]
    fn test_debug_implementation() {
        let temp_dir = TempDir::new().unwrap();
        let debug = format!("{:?}", local_source(&temp_dir));
        assert!(debug.contains("ObjectStoreSource"));
        assert!(debug.contains("type=local"));
    }

    #[test]
    fn test_local_base_uri() {
        assert_eq!(local_base_uri("/tmp/data"), "file:///tmp/data");
        assert_eq!(local_base_uri("//?/C:/Users/data"), "file:///C:/Users/data");
        assert_eq!(local_base_uri("C:\\Users\\data"), "file:///C:/Users/data");
    }

    #[test]
    fn test_parse_sas_pairs() {
        assert_eq!(
            parse_sas_pairs("?sv=2022-11-02&sig=abc"),
            vec![
                ("sv".to_string(), "2022-11-02".to_string()),
                ("sig".to_string(), "abc".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_sas_pairs_decodes_signature() {
        let pairs = parse_sas_pairs("sv=2022-11-02&sp=rl&sig=abc%2Bdef%2Fgh%3D");
        assert_eq!(
            pairs,
            vec![
                ("sv".to_string(), "2022-11-02".to_string()),
                ("sp".to_string(), "rl".to_string()),
                ("sig".to_string(), "abc+def/gh=".to_string())
            ]
        );
    }

    #[test]
    fn test_azure_container_url() {
        let target = AzureContainerUrl::parse(
            "https://myaccount.blob.core.windows.net/backups/?sv=2022&sp=rl&sig=x%2By",
        )
        .unwrap();
        assert_eq!(target.account, "myaccount");
        assert_eq!(target.container, "backups");
        assert_eq!(target.sas.len(), 3);
        assert!(target.sas.contains(&("sig".to_string(), "x+y".to_string())));

        assert!(AzureContainerUrl::parse("https://myaccount.blob.core.windows.net/").is_err());
        assert!(AzureContainerUrl::parse("not a url").is_err());
    }

    #[test]
    fn test_azure_connection_string() {
        let parsed = AzureConnectionString::parse(
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=a2V5PT0=;EndpointSuffix=core.windows.net",
        )
        .unwrap();
        assert_eq!(parsed.account_name.as_deref(), Some("acct"));
        assert_eq!(parsed.account_key.as_deref(), Some("a2V5PT0="));
        assert!(parsed.blob_endpoint.is_none());

        let azurite = AzureConnectionString::parse(
            "BlobEndpoint=http://127.0.0.1:10000/devstoreaccount1;SharedAccessSignature=sv=1&sig=2",
        )
        .unwrap();
        assert_eq!(
            azurite.blob_endpoint.as_deref(),
            Some("http://127.0.0.1:10000/devstoreaccount1")
        );
        assert_eq!(azurite.shared_access_signature.as_deref(), Some("sv=1&sig=2"));

        assert!(AzureConnectionString::parse("EndpointSuffix=x").is_err());
        assert!(AzureConnectionString::parse("garbage").is_err());
    }

    #[cfg(feature = "aws")]
    #[test]
    fn test_aws_requires_bucket() {
        let err = ObjectStoreSource::new(StorageConfig::aws()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[cfg(feature = "aws")]
    #[test]
    fn test_aws_base_uri() {
        let config = StorageConfig::aws()
            .with_option("bucket", "audit-bucket")
            .with_option("region", "us-east-1")
            .with_option("access_key_id", "AKIDEXAMPLE")
            .with_option("secret_access_key", "secret");
        let source = ObjectStoreSource::new(config).unwrap();
        assert_eq!(source.base_uri(), "s3://audit-bucket");
    }

    #[cfg(feature = "azure")]
    #[test]
    fn test_azure_base_uri_from_options() {
        let config = StorageConfig::azure()
            .with_option("container", "backups")
            .with_option("account_name", "acct")
            .with_option("access_key", "a2V5PT0=");
        let source = ObjectStoreSource::new(config).unwrap();
        assert_eq!(source.base_uri(), "az://backups");
    }

    #[cfg(not(feature = "gcp"))]
    #[test]
    fn test_gcs_unavailable_without_feature() {
        let config = StorageConfig::gcs().with_option("bucket", "b");
        match ObjectStoreSource::new(config) {
            Err(AuditError::ProviderUnavailable { feature, .. }) => assert_eq!(feature, "gcp"),
            other => panic!("Expected ProviderUnavailable, got {:?}", other),
        }
    }
}
