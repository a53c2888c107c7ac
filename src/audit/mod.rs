pub mod auditor;
pub mod classify;
pub mod error;
pub mod grouper;
pub mod options;
pub mod pipeline;
pub mod record;

pub use auditor::{Auditor, AuditorBuilder};
pub use error::{AuditError, AuditResult, ErrorKind};
pub use options::ScanOptions;
pub use record::{DuplicateId, Fingerprint, ObjectRecord, RawObject, Status};
