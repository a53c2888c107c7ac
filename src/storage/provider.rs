// Copyright 2022 Adobe. All rights reserved.
// This file is licensed to you under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may obtain a copy
// of the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under
// the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR REPRESENTATIONS
// OF ANY KIND, either express or implied. See the License for the specific language
// governing permissions and limitations under the License.

use crate::audit::error::AuditResult;
use crate::audit::record::RawObject;
use futures::stream::BoxStream;
use object_store::path::Path as ObjectPath;
use std::fmt::Debug;

/// A source of object metadata for one storage container.
///
/// Sources enumerate lazily: the stream returned by [`ObjectSource::objects`]
/// only fetches the next page when polled past the current one. Provider
/// failures must already be translated to [`crate::AuditError`] when they
/// appear on the stream.
pub trait ObjectSource: Send + Sync + Debug {
    /// URI prefix of every path this source yields, e.g. `s3://bucket`.
    fn base_uri(&self) -> &str;

    /// Enumerate objects in source order.
    ///
    /// # Arguments
    ///
    /// * `limit` - Stop after this many objects. Sources that paginate must not
    ///   request further pages once the limit is reached.
    fn objects(&self, limit: Option<usize>) -> BoxStream<'_, AuditResult<RawObject>>;
}

/// Convert a string to an object_store Path, `None` for an empty prefix.
pub(crate) fn prefix_to_path(prefix: Option<&str>) -> Option<ObjectPath> {
    prefix.filter(|p| !p.is_empty()).map(ObjectPath::from)
}

/// Join a base URI and an object location with a single slash.
pub(crate) fn join_uri(base_uri: &str, location: &str) -> String {
    format!(
        "{}/{}",
        base_uri.trim_end_matches('/'),
        location.trim_start_matches('/')
    )
}
