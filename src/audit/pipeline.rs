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

//! The scan-and-classify pipeline.
//!
//! A scan runs through `NotStarted -> Enumerating -> ClassifyingAndGrouping ->
//! Complete`, and any state may end in `Failed`. The source is drained
//! sequentially, every record is classified against one captured instant, and
//! duplicate grouping runs once over the complete record set. A failure at any
//! point discards everything collected so far.

use super::classify::ScanPolicy;
use super::error::{AuditError, AuditResult, ErrorKind};
use super::grouper::FingerprintGrouper;
use super::options::ScanOptions;
use super::record::ObjectRecord;
use crate::storage::provider::ObjectSource;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Lifecycle of a single scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    NotStarted,
    Enumerating,
    ClassifyingAndGrouping,
    Complete,
    Failed(ErrorKind),
}

struct ScanRun<'a> {
    base_uri: &'a str,
    state: ScanState,
}

impl<'a> ScanRun<'a> {
    fn new(base_uri: &'a str) -> Self {
        Self {
            base_uri,
            state: ScanState::NotStarted,
        }
    }

    fn transition(&mut self, next: ScanState) {
        debug!(
            "Scan state location={}, from={:?}, to={:?}",
            self.base_uri, self.state, next
        );
        self.state = next;
    }

    fn fail(&mut self, error: AuditError) -> AuditError {
        self.transition(ScanState::Failed(error.kind()));
        error
    }
}

/// Scan `source` with the current time and no cancellation.
pub async fn scan(source: &dyn ObjectSource, options: &ScanOptions) -> AuditResult<Vec<ObjectRecord>> {
    scan_at(source, options, Utc::now(), &CancellationToken::new()).await
}

/// Scan `source`, judging staleness against `now`.
///
/// Returns the records in source order. The scan stops pulling once
/// `options.limit` records are held and fails with [`AuditError::Cancelled`]
/// as soon as `cancel` fires.
///
/// # Errors
///
/// * `InvalidConfiguration` - The options are out of range
/// * `MalformedRecord` - The source yielded a record without a path or timestamp
/// * `Cancelled` - The token was cancelled before the scan completed
/// * Any error the source reports while enumerating
pub async fn scan_at(
    source: &dyn ObjectSource,
    options: &ScanOptions,
    now: DateTime<Utc>,
    cancel: &CancellationToken,
) -> AuditResult<Vec<ObjectRecord>> {
    let start = Instant::now();
    let mut run = ScanRun::new(source.base_uri());

    options.validate().map_err(|e| run.fail(e))?;
    let policy = ScanPolicy::new(now, options);
    let limit = options.effective_limit();

    run.transition(ScanState::Enumerating);
    let mut records: Vec<ObjectRecord> = Vec::new();
    {
        let mut objects = source.objects(limit);
        while limit.map_or(true, |n| records.len() < n) {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(run.fail(AuditError::Cancelled)),
                next = objects.next() => next,
            };

            match next {
                Some(Ok(raw)) => records.push(policy.to_record(raw).map_err(|e| run.fail(e))?),
                Some(Err(e)) => return Err(run.fail(e)),
                None => break,
            }
        }
    }

    run.transition(ScanState::ClassifyingAndGrouping);
    let stats = FingerprintGrouper::new().assign(&mut records);

    run.transition(ScanState::Complete);
    info!(
        "Scan complete location={}, count={}, stale={}, duplicate_groups={}, took={}",
        run.base_uri,
        records.len(),
        records.iter().filter(|r| r.is_stale).count(),
        stats.groups,
        start.elapsed().as_millis()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::record::RawObject;
    use crate::storage::memory::MemorySource;
    use chrono::{Duration, TimeZone};
    use futures::stream::{self, BoxStream};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn scenario_source() -> MemorySource {
        let t = reference_time();
        MemorySource::new("s3://bucket")
            .with_object("a", 1024, t - Duration::days(100))
            .with_object("b", 2048, t - Duration::days(10))
            .with_object("c", 4096, t - Duration::days(10))
            .with_object("d", 4096, t - Duration::days(10))
            .with_object("e", 99999, t - Duration::days(100))
    }

    fn by_name<'a>(records: &'a [ObjectRecord], name: &str) -> &'a ObjectRecord {
        let path = format!("s3://bucket/{}", name);
        records.iter().find(|r| r.path == path).unwrap()
    }

    /// Ignores the limit hint and counts every item pulled.
    #[derive(Debug)]
    struct GreedySource {
        pulled: AtomicUsize,
        total: usize,
    }

    impl ObjectSource for GreedySource {
        fn base_uri(&self) -> &str {
            "s3://greedy"
        }

        fn objects(&self, _limit: Option<usize>) -> BoxStream<'_, AuditResult<RawObject>> {
            stream::iter(0..self.total)
                .map(move |i| {
                    self.pulled.fetch_add(1, Ordering::SeqCst);
                    Ok(RawObject::new(
                        format!("s3://greedy/{}", i),
                        i as u64,
                        reference_time(),
                    ))
                })
                .boxed()
        }
    }

    /// Never yields an item.
    #[derive(Debug)]
    struct PendingSource;

    impl ObjectSource for PendingSource {
        fn base_uri(&self) -> &str {
            "s3://pending"
        }

        fn objects(&self, _limit: Option<usize>) -> BoxStream<'_, AuditResult<RawObject>> {
            stream::pending().boxed()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let source = scenario_source();
        let options = ScanOptions::new(90);
        let records = scan_at(&source, &options, reference_time(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 5);
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "s3://bucket/a",
                "s3://bucket/b",
                "s3://bucket/c",
                "s3://bucket/d",
                "s3://bucket/e"
            ]
        );

        assert!(by_name(&records, "a").is_stale);
        assert!(by_name(&records, "e").is_stale);
        assert!(!by_name(&records, "b").is_stale);
        assert!(!by_name(&records, "c").is_stale);

        let c = by_name(&records, "c").duplicate_id.clone();
        assert!(c.is_some());
        assert_eq!(by_name(&records, "d").duplicate_id, c);
        assert!(by_name(&records, "b").duplicate_id.is_none());
        assert!(by_name(&records, "a").duplicate_id.is_none());
        assert!(by_name(&records, "e").duplicate_id.is_none());

        // Oversize disabled: the field is never evaluated
        assert!(records.iter().all(|r| r.is_oversized.is_none()));
        assert!(records.iter().all(|r| r.status.is_none()));
    }

    #[tokio::test]
    async fn test_end_to_end_with_oversize() {
        let source = scenario_source();
        let options = ScanOptions::new(90).with_oversize_mb(0.005);
        let records = scan_at(&source, &options, reference_time(), &CancellationToken::new())
            .await
            .unwrap();

        let oversized: Vec<&str> = records
            .iter()
            .filter(|r| r.is_oversized == Some(true))
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(oversized, vec!["s3://bucket/e"]);
        assert!(records.iter().all(|r| r.is_oversized.is_some()));
    }

    #[tokio::test]
    async fn test_limit_bounds_pulls() {
        let source = scenario_source();
        let options = ScanOptions::new(90).with_limit(2);
        let records = scan_at(&source, &options, reference_time(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(source.pulled(), 2);
    }

    #[tokio::test]
    async fn test_limit_enforced_when_source_ignores_hint() {
        let source = GreedySource {
            pulled: AtomicUsize::new(0),
            total: 100,
        };
        let options = ScanOptions::new(90).with_limit(3);
        let records = scan_at(&source, &options, reference_time(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(source.pulled.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_limit_means_unlimited() {
        let source = scenario_source();
        let options = ScanOptions::new(90).with_limit(0);
        let records = scan_at(&source, &options, reference_time(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(records.len(), 5);
    }

    #[tokio::test]
    async fn test_source_failure_discards_partial_results() {
        let t = reference_time();
        let source = MemorySource::new("s3://bucket")
            .with_object("a", 1, t)
            .with_object("b", 2, t)
            .with_error(AuditError::NetworkUnavailable {
                container: "bucket".to_string(),
                message: "connection reset".to_string(),
            })
            .with_object("c", 3, t);

        let result = scan_at(&source, &ScanOptions::new(90), t, &CancellationToken::new()).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NetworkUnavailable);
        // Nothing after the failure is pulled
        assert_eq!(source.pulled(), 3);
    }

    #[tokio::test]
    async fn test_malformed_record_fails_scan() {
        let source = MemorySource::new("s3://bucket").with_raw(RawObject {
            path: "s3://bucket/x".to_string(),
            size: 1,
            last_modified: None,
        });

        let result = scan(&source, &ScanOptions::new(90)).await;
        assert!(matches!(result, Err(AuditError::MalformedRecord { .. })));
    }

    #[tokio::test]
    async fn test_invalid_options_fail_before_enumeration() {
        let source = scenario_source();
        let options = ScanOptions::new(90).with_oversize_mb(-1.0);
        let result = scan(&source, &options).await;

        assert!(matches!(result, Err(AuditError::InvalidConfiguration(_))));
        assert_eq!(source.pulled(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();

        let source = scenario_source();
        let result = scan_at(&source, &ScanOptions::new(90), reference_time(), &token).await;
        assert_eq!(result.unwrap_err(), AuditError::Cancelled);
        assert_eq!(source.pulled(), 0);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_stalled_source() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = scan_at(&PendingSource, &ScanOptions::new(90), reference_time(), &token).await;
        assert_eq!(result.unwrap_err(), AuditError::Cancelled);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let source = MemorySource::new("gs://empty");
        let records = scan(&source, &ScanOptions::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_scans_agree() {
        let source = scenario_source();
        let options = ScanOptions::new(90).with_oversize_mb(0.005);
        let first = scan_at(&source, &options, reference_time(), &CancellationToken::new())
            .await
            .unwrap();
        let second = scan_at(&source, &options, reference_time(), &CancellationToken::new())
            .await
            .unwrap();

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.path, b.path);
            assert_eq!(a.is_stale, b.is_stale);
            assert_eq!(a.is_oversized, b.is_oversized);
            assert_eq!(a.duplicate_id.is_some(), b.duplicate_id.is_some());
        }
        assert_eq!(by_name(&second, "c").duplicate_id, by_name(&second, "d").duplicate_id);
    }
}
