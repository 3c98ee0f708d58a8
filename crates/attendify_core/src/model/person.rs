//! Person registry model.
//!
//! # Invariants
//! - `id` is assigned by the caller and never changes after creation.
//! - `name` is never empty.
//! - `total_classes` equals the number of distinct marked dates for the person
//!   and is only written by the ledger recompute.

use crate::model::{non_blank, require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Caller-assigned person identifier (roll number).
pub type PersonId = String;

/// Registered person as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub contact: Option<String>,
    /// Grouping label used for cohort reporting.
    pub cohort: Option<String>,
    /// Count of distinct dates with any ledger record.
    pub total_classes: u32,
}

/// Create input for the person registry.
///
/// Deliberately has no `total_classes`: new people always start at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub id: PersonId,
    pub name: String,
    pub contact: Option<String>,
    pub cohort: Option<String>,
}

impl NewPerson {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact: None,
            cohort: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_cohort(mut self, cohort: impl Into<String>) -> Self {
        self.cohort = Some(cohort.into());
        self
    }

    /// Checks required fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_text("name", &self.name)
    }
}

/// Partial update for a person. Unset or blank fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub cohort: Option<String>,
}

impl PersonPatch {
    /// Returns `(column, value)` pairs for every field that should be written.
    pub(crate) fn assignments(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", non_blank(self.name.as_deref())),
            ("contact", non_blank(self.contact.as_deref())),
            ("cohort", non_blank(self.cohort.as_deref())),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|value| (column, value)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}

/// Ordering key for registry listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersonOrder {
    #[default]
    Id,
    CohortThenId,
}
