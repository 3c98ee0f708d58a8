//! Department head registry model.
//!
//! The credential secret is write-only: it is accepted on creation, stored as
//! a SHA-256 digest and never returned by any read model.

use crate::model::{require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default head provisioned when the registry is empty.
pub const DEFAULT_HEAD_ID: &str = "HOD001";
pub const DEFAULT_HEAD_NAME: &str = "Dr. Admin";
pub const DEFAULT_HEAD_COHORT: &str = "Computer Science";
pub const DEFAULT_HEAD_SECRET: &str = "1234";

/// Department head read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentHead {
    pub id: String,
    pub name: String,
    pub cohort: Option<String>,
}

/// Create input for a department head, including the plain secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartmentHead {
    pub id: String,
    pub name: String,
    pub cohort: Option<String>,
    pub secret: String,
}

impl NewDepartmentHead {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_text("name", &self.name)?;
        require_text("secret", &self.secret)
    }

    /// Built-in head used when no head exists yet.
    pub fn default_head() -> Self {
        Self {
            id: DEFAULT_HEAD_ID.to_string(),
            name: DEFAULT_HEAD_NAME.to_string(),
            cohort: Some(DEFAULT_HEAD_COHORT.to_string()),
            secret: DEFAULT_HEAD_SECRET.to_string(),
        }
    }
}

/// Hex-encoded SHA-256 digest stored in place of the secret.
pub fn digest_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::{digest_secret, NewDepartmentHead};

    #[test]
    fn digest_is_stable_and_not_the_plain_secret() {
        let digest = digest_secret("1234");
        assert_eq!(digest, digest_secret("1234"));
        assert_ne!(digest, "1234");
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn default_head_is_valid() {
        assert!(NewDepartmentHead::default_head().validate().is_ok());
    }
}
