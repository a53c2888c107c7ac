// Copyright 2022 Adobe. All rights reserved.
// This file is licensed to you under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may obtain a copy
// of the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under
// the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR REPRESENTATIONS
// OF ANY KIND, either express or implied. See the License for the specific language
// governing permissions and limitations under the License.

use cloud_audit::report::{save_report, ReportFormat};
use cloud_audit::{AuditSummary, Auditor, StorageConfig};
use std::path::Path;

#[tokio::main]
async fn main() {
    let storage_config = StorageConfig::local().with_option("path", "./demos");
    let auditor = Auditor::builder(storage_config)
        .with_days_stale(30)
        .with_oversize_mb(0.01)
        .build()
        .await
        .unwrap();

    let records = auditor.scan().await.unwrap();
    save_report(&records, Path::new("local_report.csv"), ReportFormat::Csv).unwrap();

    // Print summary
    println!("{}", AuditSummary::from_records(auditor.base_uri(), &records));
}
