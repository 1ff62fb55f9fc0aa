//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `employees` table.
//! - Provide the employee/department-name listing.
//!
//! # Invariants
//! - Listings are ordered by employee primary key ascending.
//! - `salary` is stored as decimal text and parsed back exactly.
//! - Unknown `department_id` on write surfaces as `ReferentialIntegrity`.

use super::{ensure_table_ready, violated_constraint, Constraint, Entity, RepoError, RepoResult};
use crate::model::employee::{Employee, EmployeeId, EmployeeWithDepartment};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    role,
    salary,
    department_id
FROM employees";

const EMPLOYEE_COLUMNS: &[&str] = &["id", "name", "role", "salary", "department_id"];

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Full-record overwrite keyed by `employee.id`.
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    /// Employees in key order, each paired with its department name.
    fn list_employees_with_department(&self) -> RepoResult<Vec<EmployeeWithDepartment>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a connection that already carries the schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "employees", EMPLOYEE_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Skips schema checks; callers must have validated `conn` before.
    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        self.conn
            .execute(
                "INSERT INTO employees (
                    id,
                    name,
                    role,
                    salary,
                    department_id
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    employee.id,
                    employee.name.as_str(),
                    employee.role.as_str(),
                    employee.salary.to_string(),
                    employee.department_id,
                ],
            )
            .map_err(|err| map_write_error(err, employee))?;

        Ok(employee.id)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE employees
                 SET
                    name = ?2,
                    role = ?3,
                    salary = ?4,
                    department_id = ?5
                 WHERE id = ?1;",
                params![
                    employee.id,
                    employee.name.as_str(),
                    employee.role.as_str(),
                    employee.salary.to_string(),
                    employee.department_id,
                ],
            )
            .map_err(|err| map_write_error(err, employee))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Employee,
                id: employee.id,
            });
        }

        Ok(())
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Employee,
                id,
            });
        }

        Ok(())
    }

    fn list_employees_with_department(&self) -> RepoResult<Vec<EmployeeWithDepartment>> {
        let mut employees = self
            .conn
            .prepare_cached(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        // One point lookup per employee, re-bound by key on every row.
        let mut department_lookup = self
            .conn
            .prepare_cached("SELECT name FROM departments WHERE id = ?1;")?;

        let mut rows = employees.query([])?;
        let mut joined = Vec::new();

        while let Some(row) = rows.next()? {
            let employee = parse_employee_row(row)?;
            let name: Option<String> = department_lookup
                .query_row([employee.department_id], |row| row.get(0))
                .optional()?;
            let department_name = name.ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "employee {} references missing department {}",
                    employee.id, employee.department_id
                ))
            })?;
            joined.push(EmployeeWithDepartment {
                employee,
                department_name,
            });
        }

        Ok(joined)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let salary_text: String = row.get("salary")?;
    let salary = Decimal::from_str(&salary_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid salary value `{salary_text}` in employees.salary"
        ))
    })?;

    let employee = Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        role: row.get("role")?,
        salary,
        department_id: row.get("department_id")?,
    };
    employee.validate()?;
    Ok(employee)
}

fn map_write_error(err: rusqlite::Error, employee: &Employee) -> RepoError {
    match violated_constraint(&err) {
        Some(Constraint::PrimaryKey) => RepoError::DuplicateKey {
            entity: Entity::Employee,
            id: employee.id,
        },
        Some(Constraint::ForeignKey) => RepoError::ReferentialIntegrity {
            department_id: employee.department_id,
        },
        None => err.into(),
    }
}
