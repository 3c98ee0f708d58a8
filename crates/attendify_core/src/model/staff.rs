//! Staff registry model. Independent of the attendance ledger.

use crate::model::{non_blank, require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub cohort: Option<String>,
    /// Subject taught by the staff member.
    pub subject: Option<String>,
}

impl StaffMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact: None,
            cohort: None,
            subject: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_text("name", &self.name)
    }
}

/// Partial update for a staff member. Unset or blank fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub cohort: Option<String>,
    pub subject: Option<String>,
}

impl StaffPatch {
    pub(crate) fn assignments(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", non_blank(self.name.as_deref())),
            ("contact", non_blank(self.contact.as_deref())),
            ("cohort", non_blank(self.cohort.as_deref())),
            ("subject", non_blank(self.subject.as_deref())),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|value| (column, value)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}
