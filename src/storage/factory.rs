use std::sync::Arc;

use super::config::StorageConfig;
use super::object_store::ObjectStoreSource;
use super::provider::ObjectSource;
use super::public::PublicSource;
use crate::audit::error::AuditResult;

/// Factory for creating object sources
pub struct SourceFactory;

impl SourceFactory {
    /// Create an object source from a configuration.
    ///
    /// With `public` set, the anonymous allow-list source is used instead of a
    /// listing backend.
    ///
    /// # Arguments
    ///
    /// * `config` - The storage configuration specifying the provider type and options
    /// * `public` - Probe known keys anonymously instead of listing
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The provider's backend is not compiled into this build
    /// * Required configuration options are missing
    /// * A local directory does not exist
    /// * Public mode is requested for an unregistered bucket
    pub fn from_config(config: StorageConfig, public: bool) -> AuditResult<Arc<dyn ObjectSource>> {
        if public {
            return Ok(Arc::new(PublicSource::new(&config)?));
        }
        Ok(Arc::new(ObjectStoreSource::new(config)?))
    }
}
