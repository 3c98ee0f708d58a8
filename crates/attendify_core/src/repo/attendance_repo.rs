//! Attendance ledger contracts and SQLite implementation.
//!
//! # Responsibility
//! - Record or correct one status per (person, date).
//! - Keep `people.total_classes` consistent with the ledger on inserts.
//! - Provide per-person history and per-date roster views.
//!
//! # Invariants
//! - A mark for an unregistered person is rejected before any write.
//! - A second mark for the same (person, date) updates in place and does not
//!   touch `total_classes`.
//! - The insert and the `total_classes` recompute commit together or not at all.
//! - `list_by_date` returns exactly one row per registered person.

use crate::model::attendance::{
    validate_date_token, AttendanceEntry, AttendanceStatus, DailyAttendanceRow, DailyStatus,
};
use crate::repo::person_repo::{person_exists, recompute_total_classes};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

/// Internal result of one mark call, kept for diagnostics.
///
/// Callers of the service layer only see success; the distinction is used for
/// logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// New (person, date) row; carries the recomputed distinct-date count.
    Inserted { total_classes: u32 },
    /// Existing row overwritten with the new status.
    Corrected,
}

/// Repository interface for the attendance ledger.
pub trait AttendanceRepository {
    /// Inserts or corrects the status for (person, date).
    fn mark(
        &self,
        person_id: &str,
        date: &str,
        status: AttendanceStatus,
    ) -> RepoResult<MarkOutcome>;
    fn is_marked(&self, person_id: &str, date: &str) -> RepoResult<bool>;
    /// Whether `person_id` is in the registry and may receive marks.
    fn person_registered(&self, person_id: &str) -> RepoResult<bool>;
    /// Person history ordered by date descending.
    fn list_by_person(&self, person_id: &str) -> RepoResult<Vec<AttendanceEntry>>;
    /// Every registered person with their status on `date`, ordered by id.
    fn list_by_date(&self, date: &str) -> RepoResult<Vec<DailyAttendanceRow>>;
}

/// SQLite-backed attendance ledger.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn mark(
        &self,
        person_id: &str,
        date: &str,
        status: AttendanceStatus,
    ) -> RepoResult<MarkOutcome> {
        validate_date_token(date)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !person_exists(&tx, person_id)? {
            return Err(RepoError::UnknownPerson(person_id.to_string()));
        }

        let corrected = tx.execute(
            "UPDATE attendance
             SET status = ?3
             WHERE person_id = ?1
               AND date = ?2;",
            params![person_id, date, status.as_str()],
        )?;

        let outcome = if corrected > 0 {
            MarkOutcome::Corrected
        } else {
            tx.execute(
                "INSERT INTO attendance (person_id, date, status) VALUES (?1, ?2, ?3);",
                params![person_id, date, status.as_str()],
            )?;
            let total_classes = recompute_total_classes(&tx, person_id)?;
            MarkOutcome::Inserted { total_classes }
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn is_marked(&self, person_id: &str, date: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM attendance
                WHERE person_id = ?1
                  AND date = ?2
            );",
            params![person_id, date],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn person_registered(&self, person_id: &str) -> RepoResult<bool> {
        person_exists(self.conn, person_id)
    }

    fn list_by_person(&self, person_id: &str) -> RepoResult<Vec<AttendanceEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, status
             FROM attendance
             WHERE person_id = ?1
             ORDER BY date DESC;",
        )?;
        let mut rows = stmt.query([person_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(AttendanceEntry {
                date: row.get("date")?,
                status: parse_status_column(row, "status")?,
            });
        }
        Ok(entries)
    }

    fn list_by_date(&self, date: &str) -> RepoResult<Vec<DailyAttendanceRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id AS person_id, p.name AS name, a.status AS status
             FROM people p
             LEFT JOIN attendance a
               ON a.person_id = p.id
              AND a.date = ?1
             ORDER BY p.id ASC;",
        )?;
        let mut rows = stmt.query([date])?;
        let mut roster = Vec::new();
        while let Some(row) = rows.next()? {
            let status = match row.get::<_, Option<String>>("status")? {
                Some(value) => DailyStatus::Marked(parse_status(&value)?),
                None => DailyStatus::NotMarked,
            };
            roster.push(DailyAttendanceRow {
                person_id: row.get("person_id")?,
                name: row.get("name")?,
                status,
            });
        }
        Ok(roster)
    }
}

fn parse_status_column(row: &Row<'_>, column: &str) -> RepoResult<AttendanceStatus> {
    let value: String = row.get(column)?;
    parse_status(&value)
}

fn parse_status(value: &str) -> RepoResult<AttendanceStatus> {
    value.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{value}` in attendance.status"
        ))
    })
}
