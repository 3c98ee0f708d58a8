//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for registries, the
//!   attendance ledger and report scans.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate inputs before SQL mutations.
//! - Multi-statement writes run inside one immediate transaction.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyExists`,
//!   `UnknownPerson`, `InvalidStatus`) in addition to storage failures.

pub mod attendance_repo;
pub mod head_repo;
pub mod person_repo;
pub mod report_repo;
pub mod staff_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::attendance::InvalidStatusError;
use crate::model::ValidationError;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Registry that owns an id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Staff,
    DepartmentHead,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Staff => "staff",
            Self::DepartmentHead => "department_head",
        }
    }
}

/// Error shared by every repository in the core.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before touching storage.
    Validation(ValidationError),
    /// Storage failure. Never absorbed; always surfaced to the caller.
    Db(DbError),
    NotFound {
        entity: EntityKind,
        id: String,
    },
    AlreadyExists {
        entity: EntityKind,
        id: String,
    },
    /// Attendance mark against an id missing from the person registry.
    UnknownPerson(String),
    /// Status outside `PRESENT`/`ABSENT`.
    InvalidStatus(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(entity: EntityKind, id: &str) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether this error belongs to the storage-failure family.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Db(_) | Self::InvalidData(_) | Self::UninitializedConnection { .. }
        )
    }

    /// Short stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Db(_) => "storage_failure",
            Self::NotFound { .. } => "not_found",
            Self::AlreadyExists { .. } => "already_exists",
            Self::UnknownPerson(_) => "unknown_person",
            Self::InvalidStatus(_) => "invalid_status",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{} not found: {id}", entity.as_str()),
            Self::AlreadyExists { entity, id } => {
                write!(f, "{} already exists: {id}", entity.as_str())
            }
            Self::UnknownPerson(id) => write!(f, "no registered person with id `{id}`"),
            Self::InvalidStatus(value) => write!(
                f,
                "invalid attendance status `{value}`; expected PRESENT|ABSENT"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InvalidStatusError> for RepoError {
    fn from(value: InvalidStatusError) -> Self {
        Self::InvalidStatus(value.0)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections that were not produced by `open_db*`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Maps a primary-key/unique violation on insert to `AlreadyExists`.
pub(crate) fn map_insert_error(err: rusqlite::Error, entity: EntityKind, id: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation
            && matches!(
                failure.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            )
        {
            return RepoError::already_exists(entity, id);
        }
    }
    err.into()
}

/// Builds `UPDATE <table> SET a = ?1, b = ?2 WHERE id = ?N;` for patch writes.
///
/// `columns` come from fixed model field lists, never from caller input.
pub(crate) fn patch_sql(table: &str, columns: &[&str]) -> String {
    let assignments = columns
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {table} SET {assignments} WHERE id = ?{};",
        columns.len() + 1
    )
}

pub(crate) fn to_u32(value: i64, column: &'static str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("value `{value}` out of range in {column}")))
}
