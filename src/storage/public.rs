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

//! Anonymous access to a few well-known public buckets.
//!
//! Anonymous callers usually cannot list a bucket, so this source probes a
//! fixed allow-list of keys with unsigned HEAD requests instead. It is a
//! degraded mode: it only ever sees the registered keys and does not scale to
//! arbitrary buckets. Prefer [`super::ObjectStoreSource`] whenever
//! credentials with list permission are available.

use super::config::{StorageConfig, StorageType};
use super::error::StorageError;
use super::provider::{join_uri, ObjectSource};
use crate::audit::error::{AuditError, AuditResult};
use crate::audit::record::RawObject;
use crate::util::retry::retry_transient;
use futures::stream::{self, BoxStream, StreamExt};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, warn};

/// Retries per HEAD request for transient failures.
const HEAD_RETRIES: usize = 2;

/// A public bucket and the keys known to exist in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicBucket {
    pub storage_type: StorageType,
    pub bucket: &'static str,
    pub keys: &'static [&'static str],
}

/// Buckets reachable in public mode.
pub const PUBLIC_BUCKETS: &[PublicBucket] = &[
    PublicBucket {
        storage_type: StorageType::Aws,
        bucket: "commoncrawl",
        keys: &[
            "crawl-data/CC-MAIN-2023-14/robotstxt.arc.gz",
            "crawl-data/CC-MAIN-2023-14/segments/1680535039241.3/warc/CC-MAIN-20230403061739-20230403091739-00000.warc.gz",
        ],
    },
    PublicBucket {
        storage_type: StorageType::Aws,
        bucket: "nyc-tlc",
        keys: &["trip_data_green_2023-01.csv", "trip_data_yellow_2023-01.csv"],
    },
    PublicBucket {
        storage_type: StorageType::Aws,
        bucket: "landsat-pds",
        keys: &["c1/L8/001/002/LC08_L1TP_001002_20200101_20200101_01_RT/LC08_L1TP_001002_20200101_20200101_01_RT_MTL.txt"],
    },
    PublicBucket {
        storage_type: StorageType::Gcs,
        bucket: "gcp-public-data-landsat",
        keys: &["LC08/01/001/002/LC08010002013197LGN00/LC08010002013197LGN00_MTL.txt"],
    },
    PublicBucket {
        storage_type: StorageType::Gcs,
        bucket: "gcp-public-data-sentinel-2",
        keys: &["tiles/30/U/UH/2023/8/10/0/B02.jp2"],
    },
    PublicBucket {
        storage_type: StorageType::Gcs,
        bucket: "gcp-public-data-noaa-goes-16",
        keys: &["ABI-L1b-RadC/2023/001/00/OR_ABI-L1b-RadC-M6C01_G16_s20230010000394_e20230010011102_c20230010011156.nc"],
    },
];

impl PublicBucket {
    /// Look up the allow-list entry for a bucket.
    ///
    /// # Errors
    ///
    /// `Unsupported` for Azure, local targets and unregistered buckets.
    pub fn lookup(storage_type: StorageType, bucket: &str) -> AuditResult<&'static PublicBucket> {
        if !matches!(storage_type, StorageType::Aws | StorageType::Gcs) {
            return Err(AuditError::Unsupported(format!(
                "Public mode is not available for provider '{}'",
                storage_type
            )));
        }

        PUBLIC_BUCKETS
            .iter()
            .find(|b| b.storage_type == storage_type && b.bucket == bucket)
            .ok_or_else(|| {
                AuditError::Unsupported(format!(
                    "Public mode not supported for bucket '{}'",
                    bucket
                ))
            })
    }

    /// HTTPS endpoint serving the bucket's objects anonymously.
    pub fn http_url(&self) -> String {
        match self.storage_type {
            StorageType::Gcs => format!("https://storage.googleapis.com/{}", self.bucket),
            _ => format!("https://{}.s3.amazonaws.com", self.bucket),
        }
    }

    pub fn base_uri(&self) -> String {
        format!("{}://{}", self.storage_type.scheme(), self.bucket)
    }
}

/// Degraded source probing the allow-listed keys of a public bucket.
pub struct PublicSource {
    bucket: &'static PublicBucket,
    store: Arc<dyn ObjectStore>,
    base_uri: String,
}

impl PublicSource {
    /// Create an anonymous source for a registered public bucket.
    ///
    /// # Errors
    ///
    /// * `Unsupported` - The bucket is not registered for public mode
    /// * `ProviderUnavailable` - The `http` feature was not compiled in
    pub fn new(config: &StorageConfig) -> AuditResult<Self> {
        let container = config.container_label();
        let bucket = PublicBucket::lookup(config.storage_type, &container)?;
        if !cfg!(feature = "http") {
            return Err(AuditError::ProviderUnavailable {
                provider: "public".to_string(),
                feature: "http".to_string(),
            });
        }
        let store = Self::build_http_store(config, bucket)
            .map_err(|e| e.into_audit_error(&container))?;

        warn!(
            "Public mode is degraded: only {} known key(s) of bucket={} are probed",
            bucket.keys.len(),
            bucket.bucket
        );

        Ok(Self::from_store(bucket, store))
    }

    /// Probe `bucket`'s keys through an already-built store.
    pub fn from_store(bucket: &'static PublicBucket, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            bucket,
            store,
            base_uri: bucket.base_uri(),
        }
    }

    pub fn bucket(&self) -> &'static PublicBucket {
        self.bucket
    }

    #[cfg(feature = "http")]
    fn build_http_store(
        config: &StorageConfig,
        bucket: &PublicBucket,
    ) -> Result<Arc<dyn ObjectStore>, StorageError> {
        use super::object_store::ObjectStoreSource;
        use object_store::http::HttpBuilder;

        let store = HttpBuilder::new()
            .with_url(bucket.http_url())
            .with_client_options(ObjectStoreSource::build_connection_options(config))
            .with_retry(Self::head_retry_options(config))
            .build()?;
        Ok(Arc::new(store))
    }

    /// The store itself must not retry: `head` already retries transient
    /// failures `HEAD_RETRIES` times.
    #[cfg(feature = "http")]
    fn head_retry_options(config: &StorageConfig) -> object_store::RetryConfig {
        object_store::RetryConfig {
            max_retries: 0,
            ..super::object_store::ObjectStoreSource::build_retry_options(config)
        }
    }

    #[cfg(not(feature = "http"))]
    fn build_http_store(
        _config: &StorageConfig,
        _bucket: &PublicBucket,
    ) -> Result<Arc<dyn ObjectStore>, StorageError> {
        Err(StorageError::ConfigError(
            "public mode requires the `http` feature".to_string(),
        ))
    }

    async fn head(&self, key: &'static str) -> AuditResult<RawObject> {
        let location = ObjectPath::from(key);
        let location = &location;
        let store = &self.store;
        let bucket = self.bucket.bucket;
        let meta = retry_transient(HEAD_RETRIES, "public HEAD", || async move {
            store
                .head(location)
                .await
                .map_err(|e| StorageError::from(e).into_audit_error(bucket))
        })
        .await?;

        Ok(RawObject::new(
            join_uri(&self.base_uri, key),
            meta.size,
            meta.last_modified,
        ))
    }
}

impl ObjectSource for PublicSource {
    fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn objects(&self, limit: Option<usize>) -> BoxStream<'_, AuditResult<RawObject>> {
        debug!(
            "Probing public bucket={}, keys={}, limit={:?}",
            self.bucket.bucket,
            self.bucket.keys.len(),
            limit
        );

        let probes = stream::iter(self.bucket.keys.iter().copied())
            .then(move |key| async move { (key, self.head(key).await) })
            .filter_map(|(key, result)| async move {
                match result {
                    Ok(raw) => Some(Ok(raw)),
                    Err(
                        e @ (AuditError::ContainerNotFound { .. }
                        | AuditError::AuthorizationDenied { .. }),
                    ) => {
                        warn!("Skipping inaccessible key={}: {}", key, e);
                        None
                    }
                    Err(e) => Some(Err(e)),
                }
            });

        match limit {
            Some(n) => probes.take(n).boxed(),
            None => probes.boxed(),
        }
    }
}

impl Debug for PublicSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicSource")
            .field("bucket", &self.bucket.bucket)
            .field("base_uri", &self.base_uri)
            .finish()
    }
}
