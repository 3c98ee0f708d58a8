//! Read-only scans backing the aggregation engine.
//!
//! # Responsibility
//! - Produce per-person record tallies joined against the registry.
//! - Produce ledger-wide pooled totals and registry sizes.
//!
//! # Invariants
//! - Registry-driven scans include people with zero records (left join).
//! - No method writes to storage.

use crate::model::attendance::AttendanceTally;
use crate::model::person::PersonId;
use crate::repo::{ensure_connection_ready, to_u32, RepoResult};
use rusqlite::{Connection, Row};

/// One registered person with their ledger counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonTally {
    pub person_id: PersonId,
    pub name: String,
    pub cohort: Option<String>,
    pub tally: AttendanceTally,
}

/// Ledger-wide counts where every record weighs the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub records: u64,
    pub present: u64,
}

/// Repository interface for aggregation scans.
pub trait ReportRepository {
    /// Tally for one person id. Unknown ids and empty histories both yield zero.
    fn tally_for_person(&self, person_id: &str) -> RepoResult<AttendanceTally>;
    /// Every registered person with their tally, ordered by id.
    fn person_tallies(&self) -> RepoResult<Vec<PersonTally>>;
    fn ledger_totals(&self) -> RepoResult<LedgerTotals>;
    fn count_people(&self) -> RepoResult<u64>;
    fn count_staff(&self) -> RepoResult<u64>;
}

/// SQLite-backed report scans.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn tally_for_person(&self, person_id: &str) -> RepoResult<AttendanceTally> {
        let (total, present): (i64, i64) = self.conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'PRESENT' THEN 1 ELSE 0 END), 0)
             FROM attendance
             WHERE person_id = ?1;",
            [person_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(AttendanceTally {
            total: to_u32(total, "attendance.count")?,
            present: to_u32(present, "attendance.present")?,
        })
    }

    fn person_tallies(&self) -> RepoResult<Vec<PersonTally>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.id AS person_id,
                p.name AS name,
                p.cohort AS cohort,
                COUNT(a.person_id) AS total,
                COALESCE(SUM(CASE WHEN a.status = 'PRESENT' THEN 1 ELSE 0 END), 0) AS present
             FROM people p
             LEFT JOIN attendance a ON a.person_id = p.id
             GROUP BY p.id, p.name, p.cohort
             ORDER BY p.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut tallies = Vec::new();
        while let Some(row) = rows.next()? {
            tallies.push(parse_person_tally_row(row)?);
        }
        Ok(tallies)
    }

    fn ledger_totals(&self) -> RepoResult<LedgerTotals> {
        let totals = self.conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'PRESENT' THEN 1 ELSE 0 END), 0)
             FROM attendance;",
            [],
            |row| {
                Ok(LedgerTotals {
                    records: row.get(0)?,
                    present: row.get(1)?,
                })
            },
        )?;
        Ok(totals)
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_staff(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM staff;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_person_tally_row(row: &Row<'_>) -> RepoResult<PersonTally> {
    let total: i64 = row.get("total")?;
    let present: i64 = row.get("present")?;
    Ok(PersonTally {
        person_id: row.get("person_id")?,
        name: row.get("name")?,
        cohort: row.get("cohort")?,
        tally: AttendanceTally {
            total: to_u32(total, "attendance.count")?,
            present: to_u32(present, "attendance.present")?,
        },
    })
}
