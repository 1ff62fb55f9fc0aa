//! Employee record, partial-update patch and joined read model.
//!
//! # Invariants
//! - `department_id` must name an existing department when written; the
//!   store enforces this, not this module.
//! - `salary` is an exact decimal and never negative.

use super::department::DepartmentId;
use super::{require_text, ModelValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Primary key of the `employees` table.
pub type EmployeeId = i64;

/// One row of the `employees` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Job title, e.g. "Clerk".
    pub role: String,
    pub salary: Decimal,
    /// Foreign key to `departments.id`; cascades on update and delete.
    pub department_id: DepartmentId,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        role: impl Into<String>,
        salary: Decimal,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role: role.into(),
            salary,
            department_id,
        }
    }

    /// Rejects records that must never be persisted.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("employee", "name", &self.name)?;
        require_text("employee", "role", &self.role)?;
        if self.salary < Decimal::ZERO {
            return Err(ModelValidationError::NegativeSalary);
        }
        Ok(())
    }

    /// Returns a copy with every field present in `patch` overwritten.
    pub fn patched(&self, patch: &EmployeePatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            role: patch.role.clone().unwrap_or_else(|| self.role.clone()),
            salary: patch.salary.unwrap_or(self.salary),
            department_id: patch.department_id.unwrap_or(self.department_id),
        }
    }
}

/// Partial employee update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub salary: Option<Decimal>,
    pub department_id: Option<DepartmentId>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.salary.is_none()
            && self.department_id.is_none()
    }
}

/// Employee row paired with the name of the department it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeWithDepartment {
    pub employee: Employee,
    pub department_name: String,
}

#[cfg(test)]
mod tests {
    use super::{Employee, EmployeePatch};
    use crate::model::ModelValidationError;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn clerk() -> Employee {
        Employee::new(10, "Ana", "Clerk", Decimal::from_str("1000.00").unwrap(), 1)
    }

    #[test]
    fn negative_salary_is_rejected() {
        let mut employee = clerk();
        employee.salary = Decimal::from_str("-0.01").unwrap();
        assert_eq!(
            employee.validate().unwrap_err(),
            ModelValidationError::NegativeSalary
        );
    }

    #[test]
    fn zero_salary_is_valid() {
        let mut employee = clerk();
        employee.salary = Decimal::ZERO;
        assert!(employee.validate().is_ok());
    }

    #[test]
    fn blank_role_is_rejected() {
        let mut employee = clerk();
        employee.role = "\t".to_string();
        assert!(matches!(
            employee.validate(),
            Err(ModelValidationError::BlankField { field: "role", .. })
        ));
    }

    #[test]
    fn patch_overwrites_only_supplied_fields() {
        let patch = EmployeePatch {
            role: Some("Manager".to_string()),
            department_id: Some(2),
            ..EmployeePatch::default()
        };
        let patched = clerk().patched(&patch);

        assert_eq!(patched.id, 10);
        assert_eq!(patched.name, "Ana");
        assert_eq!(patched.role, "Manager");
        assert_eq!(patched.salary, Decimal::from_str("1000.00").unwrap());
        assert_eq!(patched.department_id, 2);
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(EmployeePatch::default().is_empty());
        let patch = EmployeePatch {
            salary: Some(Decimal::ONE),
            ..EmployeePatch::default()
        };
        assert!(!patch.is_empty());
    }
}
