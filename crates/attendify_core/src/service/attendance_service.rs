//! Attendance ledger use-case service.
//!
//! # Responsibility
//! - Mark (insert or correct) attendance for one person on one date.
//! - Expose per-person history and per-date roster reads.
//!
//! # Invariants
//! - Callers cannot tell an insert from a correction; both succeed with `()`.
//! - Unknown people are rejected before the status is considered.

use crate::model::attendance::{AttendanceEntry, AttendanceStatus, DailyAttendanceRow};
use crate::repo::attendance_repo::{AttendanceRepository, MarkOutcome};
use crate::repo::{RepoError, RepoResult};
use crate::service::log_write_failure;
use log::{debug, info};
use std::time::Instant;

const MODULE: &str = "ledger";

/// Use-case service wrapper for the attendance ledger.
pub struct AttendanceService<R: AttendanceRepository> {
    repo: R,
}

impl<R: AttendanceRepository> AttendanceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records `status` for (`person_id`, `date`).
    ///
    /// A repeated mark for the same pair is a correction and leaves
    /// `total_classes` untouched; a first mark recomputes it.
    ///
    /// # Errors
    /// - `UnknownPerson` when `person_id` is not registered.
    /// - `Validation` when `date` is blank.
    /// - `Db` when the write cannot be committed.
    pub fn mark(&self, person_id: &str, date: &str, status: AttendanceStatus) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.repo.mark(person_id, date, status) {
            Ok(MarkOutcome::Inserted { total_classes }) => {
                info!(
                    "event=attendance_mark module={} status=ok id={} date={} mark={} outcome=inserted total_classes={} duration_ms={}",
                    MODULE,
                    person_id,
                    date,
                    status,
                    total_classes,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Ok(MarkOutcome::Corrected) => {
                info!(
                    "event=attendance_mark module={} status=ok id={} date={} mark={} outcome=corrected duration_ms={}",
                    MODULE,
                    person_id,
                    date,
                    status,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_write_failure("attendance_mark", MODULE, person_id, started_at, &err);
                Err(err)
            }
        }
    }

    /// Same as [`AttendanceService::mark`] for a status in storage spelling.
    ///
    /// # Errors
    /// - `UnknownPerson` first, then `InvalidStatus` for anything other than
    ///   `PRESENT`/`ABSENT`.
    pub fn mark_raw(&self, person_id: &str, date: &str, status: &str) -> RepoResult<()> {
        if !self.repo.person_registered(person_id)? {
            let err = RepoError::UnknownPerson(person_id.to_string());
            log_write_failure("attendance_mark", MODULE, person_id, Instant::now(), &err);
            return Err(err);
        }
        let status = status.parse::<AttendanceStatus>().map_err(|err| {
            let err = RepoError::from(err);
            log_write_failure("attendance_mark", MODULE, person_id, Instant::now(), &err);
            err
        })?;
        self.mark(person_id, date, status)
    }

    pub fn is_marked(&self, person_id: &str, date: &str) -> RepoResult<bool> {
        self.repo.is_marked(person_id, date)
    }

    /// History for one person, newest date first. Empty for unknown ids.
    pub fn by_person(&self, person_id: &str) -> RepoResult<Vec<AttendanceEntry>> {
        let entries = self.repo.list_by_person(person_id)?;
        debug!(
            "event=attendance_by_person module={} status=ok id={} rows={}",
            MODULE,
            person_id,
            entries.len()
        );
        Ok(entries)
    }

    /// Whole roster for one date; unmarked people carry `NOT_MARKED`.
    pub fn by_date(&self, date: &str) -> RepoResult<Vec<DailyAttendanceRow>> {
        self.repo.list_by_date(date)
    }
}
