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

//! Object metadata sources
//!
//! This module provides the sources a scan enumerates: a listing source for
//! every `object_store` backend (AWS S3, Azure Blob, GCS, local filesystem),
//! a degraded anonymous source for a few public buckets, and an in-memory
//! source.
//!
//! Provider failures are translated to [`crate::AuditError`] here, before
//! they reach the scan pipeline.

pub mod config;
pub mod error;
pub mod factory;
pub mod memory;
pub mod object_store;
pub mod provider;
pub mod public;

// Public exports
pub use config::{StorageConfig, StorageType};
pub use factory::SourceFactory;
pub use memory::MemorySource;
pub use object_store::ObjectStoreSource;
pub use provider::ObjectSource;
pub use public::{PublicBucket, PublicSource, PUBLIC_BUCKETS};
