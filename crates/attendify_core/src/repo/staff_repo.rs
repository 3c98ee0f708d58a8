//! Staff registry contracts and SQLite implementation.
//!
//! Structurally the person registry without ledger linkage: deleting a staff
//! member touches no other table.

use crate::model::staff::{StaffMember, StaffPatch};
use crate::model::{non_blank, PatchOutcome};
use crate::repo::{
    ensure_connection_ready, map_insert_error, patch_sql, EntityKind, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const STAFF_SELECT_SQL: &str = "SELECT
    id,
    name,
    contact,
    cohort,
    subject
FROM staff";

/// Repository interface for the staff registry.
pub trait StaffRepository {
    fn create_staff(&self, member: &StaffMember) -> RepoResult<()>;
    fn patch_staff(&self, id: &str, patch: &StaffPatch) -> RepoResult<PatchOutcome>;
    fn get_staff(&self, id: &str) -> RepoResult<Option<StaffMember>>;
    fn delete_staff(&self, id: &str) -> RepoResult<()>;
    /// Lists every staff member ordered by id.
    fn list_staff(&self) -> RepoResult<Vec<StaffMember>>;
    fn count_staff(&self) -> RepoResult<u64>;
}

/// SQLite-backed staff registry.
pub struct SqliteStaffRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStaffRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StaffRepository for SqliteStaffRepository<'_> {
    fn create_staff(&self, member: &StaffMember) -> RepoResult<()> {
        member.validate()?;

        if self.get_staff(&member.id)?.is_some() {
            return Err(RepoError::already_exists(EntityKind::Staff, &member.id));
        }

        self.conn
            .execute(
                "INSERT INTO staff (id, name, contact, cohort, subject)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    member.id.as_str(),
                    member.name.trim(),
                    non_blank(member.contact.as_deref()),
                    non_blank(member.cohort.as_deref()),
                    non_blank(member.subject.as_deref()),
                ],
            )
            .map_err(|err| map_insert_error(err, EntityKind::Staff, &member.id))?;
        Ok(())
    }

    fn patch_staff(&self, id: &str, patch: &StaffPatch) -> RepoResult<PatchOutcome> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Ok(PatchOutcome::NoChanges);
        }

        let columns: Vec<&str> = assignments.iter().map(|(column, _)| *column).collect();
        let bind_values = assignments
            .iter()
            .map(|(_, value)| Value::Text((*value).to_string()))
            .chain(std::iter::once(Value::Text(id.to_string())));

        let changed = self
            .conn
            .execute(&patch_sql("staff", &columns), params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Staff, id));
        }
        Ok(PatchOutcome::Applied)
    }

    fn get_staff(&self, id: &str) -> RepoResult<Option<StaffMember>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STAFF_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_staff_row(row)?));
        }
        Ok(None)
    }

    fn delete_staff(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM staff WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Staff, id));
        }
        Ok(())
    }

    fn list_staff(&self) -> RepoResult<Vec<StaffMember>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STAFF_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_staff_row(row)?);
        }
        Ok(members)
    }

    fn count_staff(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM staff;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_staff_row(row: &Row<'_>) -> RepoResult<StaffMember> {
    Ok(StaffMember {
        id: row.get("id")?,
        name: row.get("name")?,
        contact: row.get("contact")?,
        cohort: row.get("cohort")?,
        subject: row.get("subject")?,
    })
}
