//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the registry, ledger and report APIs.
//! - Emit metadata-only diagnostic events for every write.
//! - Keep portal/CLI layers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository validation or transactions.
//! - Storage failures are logged and propagated, never swallowed.

pub mod attendance_service;
pub mod head_service;
pub mod person_service;
pub mod report_service;
pub mod seed;
pub mod staff_service;

use crate::repo::RepoError;
use log::{error, warn};
use std::time::Instant;

/// Logs a failed write: storage failures at `error`, rejected input at `warn`.
pub(crate) fn log_write_failure(
    event: &str,
    module: &str,
    subject_id: &str,
    started_at: Instant,
    err: &RepoError,
) {
    if err.is_storage_failure() {
        error!(
            "event={} module={} status=error id={} duration_ms={} error_code={} error={}",
            event,
            module,
            subject_id,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        );
    } else {
        warn!(
            "event={} module={} status=rejected id={} duration_ms={} error_code={}",
            event,
            module,
            subject_id,
            started_at.elapsed().as_millis(),
            err.code()
        );
    }
}
