//! Department head registry contracts and SQLite implementation.
//!
//! # Invariants
//! - The `secret` column only ever holds a hex SHA-256 digest.
//! - Read models never expose the stored digest.

use crate::model::head::{digest_secret, DepartmentHead, NewDepartmentHead};
use crate::model::non_blank;
use crate::repo::{ensure_connection_ready, map_insert_error, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for the department head registry.
pub trait HeadRepository {
    fn create_head(&self, head: &NewDepartmentHead) -> RepoResult<()>;
    fn get_head(&self, id: &str) -> RepoResult<Option<DepartmentHead>>;
    /// Lists every head ordered by id.
    fn list_heads(&self) -> RepoResult<Vec<DepartmentHead>>;
    fn count_heads(&self) -> RepoResult<u64>;
    /// Checks a plain secret against the stored digest. Unknown ids never match.
    fn verify_secret(&self, id: &str, secret: &str) -> RepoResult<bool>;
}

/// SQLite-backed department head registry.
pub struct SqliteHeadRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHeadRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HeadRepository for SqliteHeadRepository<'_> {
    fn create_head(&self, head: &NewDepartmentHead) -> RepoResult<()> {
        head.validate()?;

        if self.get_head(&head.id)?.is_some() {
            return Err(RepoError::already_exists(EntityKind::DepartmentHead, &head.id));
        }

        self.conn
            .execute(
                "INSERT INTO department_heads (id, name, cohort, secret)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    head.id.as_str(),
                    head.name.trim(),
                    non_blank(head.cohort.as_deref()),
                    digest_secret(&head.secret),
                ],
            )
            .map_err(|err| map_insert_error(err, EntityKind::DepartmentHead, &head.id))?;
        Ok(())
    }

    fn get_head(&self, id: &str) -> RepoResult<Option<DepartmentHead>> {
        let head = self
            .conn
            .query_row(
                "SELECT id, name, cohort FROM department_heads WHERE id = ?1;",
                [id],
                parse_head_row,
            )
            .optional()?;
        Ok(head)
    }

    fn list_heads(&self) -> RepoResult<Vec<DepartmentHead>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, cohort FROM department_heads ORDER BY id ASC;")?;
        let heads = stmt
            .query_map([], parse_head_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(heads)
    }

    fn count_heads(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM department_heads;", [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    fn verify_secret(&self, id: &str, secret: &str) -> RepoResult<bool> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT secret FROM department_heads WHERE id = ?1;",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stored.is_some_and(|digest| digest == digest_secret(secret)))
    }
}

fn parse_head_row(row: &Row<'_>) -> rusqlite::Result<DepartmentHead> {
    Ok(DepartmentHead {
        id: row.get("id")?,
        name: row.get("name")?,
        cohort: row.get("cohort")?,
    })
}
