//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing is ordered by primary key ascending.
//! - Deleting or renumbering a department is cascaded to `employees` by
//!   the foreign key, never by code in this module.

use super::{ensure_table_ready, violated_constraint, Constraint, Entity, RepoError, RepoResult};
use crate::model::department::{Department, DepartmentId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const DEPARTMENT_COLUMNS: &[&str] = &["id", "name"];

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn create_department(&self, department: &Department) -> RepoResult<DepartmentId>;
    /// Full-record overwrite keyed by `department.id`.
    fn update_department(&self, department: &Department) -> RepoResult<()>;
    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>>;
    fn list_departments(&self) -> RepoResult<Vec<Department>>;
    /// Deletes one department; returns how many employees were cascaded with it.
    fn delete_department(&self, id: DepartmentId) -> RepoResult<usize>;
    /// Changes a department key; dependent employees follow via cascade.
    fn renumber_department(&self, id: DepartmentId, new_id: DepartmentId) -> RepoResult<()>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Constructs a repository from a connection that already carries the schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "departments", DEPARTMENT_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Skips schema checks; callers must have validated `conn` before.
    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_department(&self, department: &Department) -> RepoResult<DepartmentId> {
        department.validate()?;

        self.conn
            .execute(
                "INSERT INTO departments (id, name) VALUES (?1, ?2);",
                params![department.id, department.name.as_str()],
            )
            .map_err(|err| map_write_error(err, department.id))?;

        Ok(department.id)
    }

    fn update_department(&self, department: &Department) -> RepoResult<()> {
        department.validate()?;

        let changed = self.conn.execute(
            "UPDATE departments SET name = ?2 WHERE id = ?1;",
            params![department.id, department.name.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Department,
                id: department.id,
            });
        }

        Ok(())
    }

    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        let department = self
            .conn
            .query_row(
                "SELECT id, name FROM departments WHERE id = ?1;",
                [id],
                parse_department_row,
            )
            .optional()?;
        Ok(department)
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM departments ORDER BY id ASC;")?;
        let departments = stmt
            .query_map([], parse_department_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(departments)
    }

    fn delete_department(&self, id: DepartmentId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;

        let dependents: i64 = tx.query_row(
            "SELECT COUNT(*) FROM employees WHERE department_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        let changed = tx.execute("DELETE FROM departments WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Department,
                id,
            });
        }

        tx.commit()?;
        usize::try_from(dependents)
            .map_err(|_| RepoError::InvalidData(format!("negative employee count {dependents}")))
    }

    fn renumber_department(&self, id: DepartmentId, new_id: DepartmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE departments SET id = ?2 WHERE id = ?1;",
                params![id, new_id],
            )
            .map_err(|err| map_write_error(err, new_id))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Department,
                id,
            });
        }

        Ok(())
    }
}

fn parse_department_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn map_write_error(err: rusqlite::Error, id: DepartmentId) -> RepoError {
    match violated_constraint(&err) {
        Some(Constraint::PrimaryKey) => RepoError::DuplicateKey {
            entity: Entity::Department,
            id,
        },
        _ => err.into(),
    }
}
