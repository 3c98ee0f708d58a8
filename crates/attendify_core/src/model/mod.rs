//! Domain model for the attendance core.
//!
//! # Responsibility
//! - Define the registry records (people, staff, department heads).
//! - Define ledger records and the derived tallies computed from them.
//!
//! # Invariants
//! - Every record is identified by a caller-assigned, immutable text id.
//! - `Person::total_classes` is a derived cache; no public input type carries it.
//! - An unmarked day is represented by the absence of a record, never a status.

pub mod attendance;
pub mod head;
pub mod person;
pub mod staff;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Returns `Some(trimmed)` for a non-blank patch value, `None` otherwise.
///
/// Patch fields follow "only non-empty values apply" semantics.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Input validation failure raised before any storage write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    EmptyField(&'static str),
    /// An id carries leading or trailing whitespace.
    PaddedId(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::PaddedId(field) => {
                write!(f, "`{field}` must not start or end with whitespace")
            }
        }
    }
}

impl Error for ValidationError {}

/// Result of a partial-field patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// At least one field was written.
    Applied,
    /// The patch carried no non-empty field; storage was not touched.
    NoChanges,
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Ids are matched verbatim; blank or padded ids are rejected.
pub(crate) fn require_id(value: &str) -> Result<(), ValidationError> {
    require_text("id", value)?;
    if value.trim() != value {
        return Err(ValidationError::PaddedId("id"));
    }
    Ok(())
}
