// Copyright 2022 Adobe. All rights reserved.
// This file is licensed to you under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may obtain a copy
// of the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under
// the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR REPRESENTATIONS
// OF ANY KIND, either express or implied. See the License for the specific language
// governing permissions and limitations under the License.

use chrono::{Duration, Utc};
use cloud_audit::report::{render_report, ReportFormat};
use cloud_audit::storage::MemorySource;
use cloud_audit::{Auditor, ScanOptions};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let now = Utc::now();
    let source = MemorySource::new("s3://inventory")
        .with_object("archive/2019.tar", 7_340_032, now - Duration::days(1500))
        .with_object("images/logo.png", 20_480, now - Duration::days(3))
        .with_object("images/logo-copy.png", 20_480, now - Duration::days(3))
        .with_object("data/latest.parquet", 1_048_576, now);

    let options = ScanOptions::new(365).with_oversize_mb(5.0);
    let auditor = Auditor::from_source(Arc::new(source), options).unwrap();
    let records = auditor.scan().await.unwrap();

    println!("{}", render_report(&records, ReportFormat::Json).unwrap());
}
