//! Person registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/patch/find/delete/list over the `people` table.
//! - Own the `total_classes` recompute hook used by the attendance ledger.
//!
//! # Invariants
//! - `create_person` and `patch_person` never write `total_classes`.
//! - `delete_person` removes ledger rows and the person row in one transaction.
//! - `total_classes` is always recomputed from the ledger, never incremented.

use crate::model::person::{NewPerson, Person, PersonOrder, PersonPatch};
use crate::model::{non_blank, PatchOutcome};
use crate::repo::{
    ensure_connection_ready, map_insert_error, patch_sql, to_u32, EntityKind, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    contact,
    cohort,
    total_classes
FROM people";

/// Repository interface for the person registry.
pub trait PersonRepository {
    /// Inserts a new person with `total_classes = 0`.
    fn create_person(&self, person: &NewPerson) -> RepoResult<()>;
    /// Applies non-empty patch fields.
    fn patch_person(&self, id: &str, patch: &PersonPatch) -> RepoResult<PatchOutcome>;
    fn get_person(&self, id: &str) -> RepoResult<Option<Person>>;
    /// Deletes a person and all of its ledger rows. Returns removed row count.
    fn delete_person(&self, id: &str) -> RepoResult<usize>;
    /// Lists every person in the requested order.
    fn list_people(&self, order: PersonOrder) -> RepoResult<Vec<Person>>;
    fn person_exists(&self, id: &str) -> RepoResult<bool>;
    fn count_people(&self) -> RepoResult<u64>;
}

/// SQLite-backed person registry.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &NewPerson) -> RepoResult<()> {
        person.validate()?;

        if person_exists(self.conn, &person.id)? {
            return Err(RepoError::already_exists(EntityKind::Person, &person.id));
        }

        self.conn
            .execute(
                "INSERT INTO people (id, name, contact, cohort, total_classes)
                 VALUES (?1, ?2, ?3, ?4, 0);",
                params![
                    person.id.as_str(),
                    person.name.trim(),
                    non_blank(person.contact.as_deref()),
                    non_blank(person.cohort.as_deref()),
                ],
            )
            .map_err(|err| map_insert_error(err, EntityKind::Person, &person.id))?;
        Ok(())
    }

    fn patch_person(&self, id: &str, patch: &PersonPatch) -> RepoResult<PatchOutcome> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Ok(PatchOutcome::NoChanges);
        }

        let columns: Vec<&str> = assignments.iter().map(|(column, _)| *column).collect();
        let mut bind_values: Vec<Value> = assignments
            .iter()
            .map(|(_, value)| Value::Text((*value).to_string()))
            .collect();
        bind_values.push(Value::Text(id.to_string()));

        let changed = self
            .conn
            .execute(&patch_sql("people", &columns), params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Person, id));
        }
        Ok(PatchOutcome::Applied)
    }

    fn get_person(&self, id: &str) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn delete_person(&self, id: &str) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !person_exists(&tx, id)? {
            return Err(RepoError::not_found(EntityKind::Person, id));
        }

        let removed_records = tx.execute("DELETE FROM attendance WHERE person_id = ?1;", [id])?;
        let removed_people = tx.execute("DELETE FROM people WHERE id = ?1;", [id])?;
        if removed_people != 1 {
            return Err(RepoError::InvalidData(format!(
                "expected to delete one person row for `{id}`, deleted {removed_people}"
            )));
        }

        tx.commit()?;
        Ok(removed_records)
    }

    fn list_people(&self, order: PersonOrder) -> RepoResult<Vec<Person>> {
        let order_by = match order {
            PersonOrder::Id => "id ASC",
            PersonOrder::CohortThenId => "cohort ASC, id ASC",
        };
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY {order_by};"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn person_exists(&self, id: &str) -> RepoResult<bool> {
        person_exists(self.conn, id)
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Recomputes `total_classes` for one person from the ledger and writes it back.
///
/// Called by the attendance ledger inside its insert transaction; the count is
/// always a full distinct-date scan so drifted values heal on the next insert.
pub(crate) fn recompute_total_classes(conn: &Connection, person_id: &str) -> RepoResult<u32> {
    let distinct_dates: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT date) FROM attendance WHERE person_id = ?1;",
        [person_id],
        |row| row.get(0),
    )?;
    let total_classes = to_u32(distinct_dates, "attendance.date")?;

    let changed = conn.execute(
        "UPDATE people SET total_classes = ?2 WHERE id = ?1;",
        params![person_id, total_classes],
    )?;
    if changed == 0 {
        return Err(RepoError::UnknownPerson(person_id.to_string()));
    }
    Ok(total_classes)
}

pub(crate) fn person_exists(conn: &Connection, id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM people WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let total_classes: i64 = row.get("total_classes")?;
    Ok(Person {
        id: row.get("id")?,
        name: row.get("name")?,
        contact: row.get("contact")?,
        cohort: row.get("cohort")?,
        total_classes: to_u32(total_classes, "people.total_classes")?,
    })
}
