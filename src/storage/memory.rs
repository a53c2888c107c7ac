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

use super::provider::{join_uri, ObjectSource};
use crate::audit::error::{AuditError, AuditResult};
use crate::audit::record::RawObject;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-process source over metadata the caller already holds.
///
/// Items are yielded in insertion order. [`MemorySource::pulled`] reports how
/// many items consumers actually pulled, which makes limit handling
/// observable.
#[derive(Debug)]
pub struct MemorySource {
    base_uri: String,
    items: Vec<AuditResult<RawObject>>,
    pulled: AtomicUsize,
}

impl MemorySource {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            items: Vec::new(),
            pulled: AtomicUsize::new(0),
        }
    }

    /// Add an object whose path is `<base_uri>/<key>`.
    pub fn with_object(mut self, key: &str, size: u64, last_modified: DateTime<Utc>) -> Self {
        let path = join_uri(&self.base_uri, key);
        self.items.push(Ok(RawObject::new(path, size, last_modified)));
        self
    }

    pub fn with_raw(mut self, raw: RawObject) -> Self {
        self.items.push(Ok(raw));
        self
    }

    /// Fail enumeration at this position.
    pub fn with_error(mut self, error: AuditError) -> Self {
        self.items.push(Err(error));
        self
    }

    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ObjectSource for MemorySource {
    fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn objects(&self, limit: Option<usize>) -> BoxStream<'_, AuditResult<RawObject>> {
        let take = limit.unwrap_or(self.items.len());
        stream::iter(self.items.iter().take(take))
            .map(move |item| {
                self.pulled.fetch_add(1, Ordering::SeqCst);
                item.clone()
            })
            .boxed()
    }
}
