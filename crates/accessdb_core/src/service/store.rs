//! Department/Employee store facade.
//!
//! # Responsibility
//! - Attach to an existing table file or create it with the full schema.
//! - Expose typed CRUD entry points over both tables.
//! - Release the file handle on `close` or drop.
//!
//! # Invariants
//! - Every operation commits independently; there is no multi-call atomicity.
//! - Missing keys on lookups return `None`; on update/delete `NotFound`.
//! - Log events carry keys and outcomes only, never names or salaries.

use crate::db::{open_db_in_memory, open_db_tracked, DbError, DbResult};
use crate::model::department::{Department, DepartmentId};
use crate::model::employee::{Employee, EmployeeId, EmployeePatch, EmployeeWithDepartment};
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::{Entity, RepoError, RepoResult};
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;

/// How `Store::open` obtained its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// The file already carried the schema and was attached.
    Attached,
    /// The schema was defined by this open, whether or not the file existed.
    Created,
    /// Transient in-memory database.
    InMemory,
}

/// Single owner of the table file for one session.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    mode: OpenMode,
}

impl Store {
    /// Opens the table file at `path`, creating it with both tables when missing.
    ///
    /// # Errors
    /// - Returns `DbError` when the file cannot be opened, created or migrated.
    ///   The store is unusable afterwards and callers should abort.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let (conn, created) = open_db_tracked(path)?;
        ensure_store_ready(&conn)?;
        let mode = if created {
            OpenMode::Created
        } else {
            OpenMode::Attached
        };
        info!(
            "event=store_open module=store status=ok mode={}",
            mode_label(mode)
        );

        Ok(Self { conn, mode })
    }

    /// Opens a transient store with the full schema.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        ensure_store_ready(&conn)?;
        Ok(Self {
            conn,
            mode: OpenMode::InMemory,
        })
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn insert_department(&self, department: &Department) -> RepoResult<DepartmentId> {
        logged(
            "department_insert",
            department.id,
            self.departments().create_department(department),
        )
    }

    pub fn find_department(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        self.departments().get_department(id)
    }

    /// Overwrites the department stored under `department.id`.
    pub fn update_department(&self, department: &Department) -> RepoResult<()> {
        logged(
            "department_update",
            department.id,
            self.departments().update_department(department),
        )
    }

    /// Moves a department to `new_id`; its employees follow.
    pub fn renumber_department(&self, id: DepartmentId, new_id: DepartmentId) -> RepoResult<()> {
        logged(
            "department_renumber",
            id,
            self.departments().renumber_department(id, new_id),
        )
    }

    /// Deletes a department and, by cascade, every employee referencing it.
    ///
    /// Returns the number of employees removed with it.
    pub fn delete_department(&self, id: DepartmentId) -> RepoResult<usize> {
        let result = logged(
            "department_delete",
            id,
            self.departments().delete_department(id),
        );
        if let Ok(cascaded) = &result {
            info!(
                "event=department_cascade module=store status=ok id={id} employees={cascaded}"
            );
        }
        result
    }

    pub fn list_departments(&self) -> RepoResult<Vec<Department>> {
        self.departments().list_departments()
    }

    pub fn insert_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        logged(
            "employee_insert",
            employee.id,
            self.employees().create_employee(employee),
        )
    }

    pub fn find_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.employees().get_employee(id)
    }

    /// Overwrites every field of the employee stored under `employee.id`.
    pub fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        logged(
            "employee_update",
            employee.id,
            self.employees().update_employee(employee),
        )
    }

    /// Overwrites only the fields present in `patch`, returning the stored record.
    pub fn patch_employee(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<Employee> {
        logged("employee_patch", id, self.apply_patch(id, patch))
    }

    pub fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        logged("employee_delete", id, self.employees().delete_employee(id))
    }

    pub fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.employees().list_employees()
    }

    /// Employees in key order paired with their department names.
    pub fn list_employees_with_department_name(
        &self,
    ) -> RepoResult<Vec<EmployeeWithDepartment>> {
        self.employees().list_employees_with_department()
    }

    /// Flushes and releases the file handle.
    pub fn close(self) -> DbResult<()> {
        let mode = self.mode;
        self.conn.close().map_err(|(_conn, err)| {
            warn!("event=store_close module=store status=error error={err}");
            DbError::Sqlite(err)
        })?;
        info!(
            "event=store_close module=store status=ok mode={}",
            mode_label(mode)
        );
        Ok(())
    }

    fn apply_patch(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<Employee> {
        let employees = self.employees();
        let current = employees.get_employee(id)?.ok_or(RepoError::NotFound {
            entity: Entity::Employee,
            id,
        })?;
        let updated = current.patched(patch);
        employees.update_employee(&updated)?;
        Ok(updated)
    }

    fn departments(&self) -> SqliteDepartmentRepository<'_> {
        SqliteDepartmentRepository::new_unchecked(&self.conn)
    }

    fn employees(&self) -> SqliteEmployeeRepository<'_> {
        SqliteEmployeeRepository::new_unchecked(&self.conn)
    }
}

fn ensure_store_ready(conn: &Connection) -> DbResult<()> {
    let checked = SqliteDepartmentRepository::try_new(conn)
        .and_then(|_| SqliteEmployeeRepository::try_new(conn));
    match checked {
        Ok(_) => Ok(()),
        Err(RepoError::Db(err)) => Err(err),
        Err(other) => Err(DbError::IncompatibleSchema(other.to_string())),
    }
}

fn logged<T>(event: &str, id: i64, result: RepoResult<T>) -> RepoResult<T> {
    match &result {
        Ok(_) => info!("event={event} module=store status=ok id={id}"),
        Err(err) => warn!(
            "event={event} module=store status=error id={id} error_code={} error={err}",
            error_code(err)
        ),
    }
    result
}

fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "validation_failed",
        RepoError::Db(_) => "db_error",
        RepoError::NotFound { .. } => "not_found",
        RepoError::DuplicateKey { .. } => "duplicate_key",
        RepoError::ReferentialIntegrity { .. } => "referential_integrity",
        RepoError::InvalidData(_) => "invalid_data",
        RepoError::UninitializedConnection { .. }
        | RepoError::MissingRequiredTable(_)
        | RepoError::MissingRequiredColumn { .. } => "schema_mismatch",
    }
}

fn mode_label(mode: OpenMode) -> &'static str {
    match mode {
        OpenMode::Attached => "attach",
        OpenMode::Created => "create",
        OpenMode::InMemory => "memory",
    }
}
