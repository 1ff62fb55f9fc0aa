//! Domain model for the Department/Employee tables.
//!
//! # Responsibility
//! - Define the records persisted by the store and the joined read model.
//! - Validate records before they reach persistence.
//!
//! # Invariants
//! - Every record is identified by a caller-supplied integer key.
//! - Employees reference departments by numeric id, never by name.

pub mod department;
pub mod employee;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record-level validation failure raised before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty or whitespace only.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
    /// Salary must be zero or positive.
    NegativeSalary,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity} `{field}` must not be blank")
            }
            Self::NegativeSalary => write!(f, "employee `salary` must not be negative"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::BlankField { entity, field });
    }
    Ok(())
}
