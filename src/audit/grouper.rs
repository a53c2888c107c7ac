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

//! Metadata-based duplicate grouping.
//!
//! Records are partitioned by [`Fingerprint`] in one pass over the record
//! arena; each partition stores arena indices, so the write-back touches every
//! duplicate exactly once. Group ids come from a per-grouper random hasher and
//! differ between runs.

use super::record::{DuplicateId, Fingerprint, ObjectRecord};
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::debug;

/// Outcome of a grouping pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Number of fingerprints shared by two or more records
    pub groups: usize,
    /// Number of records that received a duplicate id
    pub duplicate_records: usize,
}

#[derive(Debug, Default)]
pub struct FingerprintGrouper {
    id_hasher: RandomState,
}

impl FingerprintGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for a fingerprint, stable for the lifetime of this grouper.
    pub fn id_for(&self, fingerprint: &Fingerprint) -> DuplicateId {
        DuplicateId::from_hash(self.id_hasher.hash_one(fingerprint))
    }

    /// Assign `duplicate_id` to every record whose fingerprint is shared and
    /// clear it on the rest.
    pub fn assign(&self, records: &mut [ObjectRecord]) -> GroupingStats {
        let mut partitions: HashMap<Fingerprint, Vec<usize>> = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            partitions
                .entry(record.fingerprint())
                .or_default()
                .push(index);
        }

        let mut stats = GroupingStats::default();
        for (fingerprint, members) in &partitions {
            if members.len() < 2 {
                records[members[0]].duplicate_id = None;
                continue;
            }

            let id = self.id_for(fingerprint);
            for &index in members {
                records[index].duplicate_id = Some(id.clone());
            }
            stats.groups += 1;
            stats.duplicate_records += members.len();
        }

        debug!(
            "Grouped count={} records into fingerprints={}, duplicate_groups={}, duplicate_records={}",
            records.len(),
            partitions.len(),
            stats.groups,
            stats.duplicate_records
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
    }

    fn record(path: &str, size: u64, last_modified: DateTime<Utc>) -> ObjectRecord {
        ObjectRecord {
            path: path.to_string(),
            size,
            last_modified,
            is_stale: false,
            is_oversized: None,
            duplicate_id: None,
            status: None,
        }
    }

    #[test]
    fn test_pairs_share_id_and_singletons_stay_null() {
        let recent = base() - Duration::days(10);
        let mut records = vec![
            record("s3://b/recent-file.log", 2048, recent),
            record("s3://b/docs/report.pdf", 4096, recent),
            record("s3://b/backup/report.pdf", 4096, recent),
        ];

        let stats = FingerprintGrouper::new().assign(&mut records);

        assert_eq!(stats.groups, 1);
        assert_eq!(stats.duplicate_records, 2);
        assert!(records[0].duplicate_id.is_none());
        assert!(records[1].duplicate_id.is_some());
        assert_eq!(records[1].duplicate_id, records[2].duplicate_id);
    }

    #[test]
    fn test_distinct_fingerprints_get_distinct_ids() {
        let mut records = vec![
            record("a", 1, base()),
            record("b", 1, base()),
            record("c", 2, base()),
            record("d", 2, base()),
            record("e", 1, base() + Duration::seconds(1)),
            record("f", 1, base() + Duration::seconds(1)),
        ];

        let stats = FingerprintGrouper::new().assign(&mut records);

        assert_eq!(stats.groups, 3);
        assert_ne!(records[0].duplicate_id, records[2].duplicate_id);
        assert_ne!(records[0].duplicate_id, records[4].duplicate_id);
        assert_ne!(records[2].duplicate_id, records[4].duplicate_id);
    }

    #[test]
    fn test_subsecond_jitter_still_groups() {
        let mut records = vec![
            record("s3://b/one", 10, base() + Duration::milliseconds(1)),
            record("s3://b/two", 10, base() + Duration::milliseconds(900)),
        ];
        FingerprintGrouper::new().assign(&mut records);
        assert!(records[0].duplicate_id.is_some());
        assert_eq!(records[0].duplicate_id, records[1].duplicate_id);
    }

    #[test]
    fn test_three_way_group_is_single_group() {
        let mut records = vec![
            record("a", 7, base()),
            record("b", 7, base()),
            record("c", 7, base()),
        ];
        let stats = FingerprintGrouper::new().assign(&mut records);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.duplicate_records, 3);
        assert_eq!(records[0].duplicate_id, records[2].duplicate_id);
    }

    #[test]
    fn test_reassign_clears_stale_ids_and_keeps_structure() {
        let grouper = FingerprintGrouper::new();
        let mut records = vec![record("a", 1, base()), record("b", 1, base())];
        grouper.assign(&mut records);
        let first = records[0].duplicate_id.clone();

        grouper.assign(&mut records);
        assert_eq!(records[0].duplicate_id, first);

        records[1].size = 2;
        grouper.assign(&mut records);
        assert!(records[0].duplicate_id.is_none());
        assert!(records[1].duplicate_id.is_none());
    }

    #[test]
    fn test_empty_input() {
        let mut records: Vec<ObjectRecord> = Vec::new();
        assert_eq!(
            FingerprintGrouper::new().assign(&mut records),
            GroupingStats::default()
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let mut records = vec![
            record("z", 1, base()),
            record("a", 2, base()),
            record("m", 1, base()),
        ];
        FingerprintGrouper::new().assign(&mut records);
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["z", "a", "m"]);
    }

    fn arb_records() -> impl Strategy<Value = Vec<ObjectRecord>> {
        // Small domains so collisions are frequent
        prop::collection::vec((0u64..4, 0i64..4), 0..40).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (size, secs))| {
                    record(&format!("obj-{}", i), size, base() + Duration::seconds(secs))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_shared_id_iff_equal_fingerprint(mut records in arb_records()) {
            FingerprintGrouper::new().assign(&mut records);

            for a in &records {
                let same_fp = records
                    .iter()
                    .filter(|b| b.fingerprint() == a.fingerprint())
                    .count();
                prop_assert_eq!(a.duplicate_id.is_some(), same_fp > 1);

                for b in &records {
                    if a.duplicate_id.is_some() && b.duplicate_id.is_some() {
                        prop_assert_eq!(
                            a.duplicate_id == b.duplicate_id,
                            a.fingerprint() == b.fingerprint()
                        );
                    }
                }
            }
        }

        #[test]
        fn prop_grouping_is_transitive(mut records in arb_records()) {
            FingerprintGrouper::new().assign(&mut records);

            for a in &records {
                for b in &records {
                    for c in &records {
                        if a.duplicate_id.is_some()
                            && a.duplicate_id == b.duplicate_id
                            && b.duplicate_id == c.duplicate_id
                        {
                            prop_assert_eq!(&a.duplicate_id, &c.duplicate_id);
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_structure_is_stable_across_groupers(records in arb_records()) {
            let mut first = records.clone();
            let mut second = records;
            FingerprintGrouper::new().assign(&mut first);
            FingerprintGrouper::new().assign(&mut second);

            for i in 0..first.len() {
                for j in 0..first.len() {
                    prop_assert_eq!(
                        first[i].duplicate_id.is_some() && first[i].duplicate_id == first[j].duplicate_id,
                        second[i].duplicate_id.is_some() && second[i].duplicate_id == second[j].duplicate_id
                    );
                }
            }
        }
    }
}
