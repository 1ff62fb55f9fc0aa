//! Department record.

use super::{require_text, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Primary key of the `departments` table.
pub type DepartmentId = i64;

/// One row of the `departments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Caller-supplied unique key; employees reference it.
    pub id: DepartmentId,
    /// Display name shown next to employees in joined listings.
    pub name: String,
}

impl Department {
    pub fn new(id: DepartmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Rejects records that must never be persisted.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("department", "name", &self.name)
    }
}
