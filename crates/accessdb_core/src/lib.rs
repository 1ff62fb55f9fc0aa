//! Core storage logic for the Department/Employee table file.
//! This crate owns the schema, the referential-integrity rules and all CRUD.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentId};
pub use model::employee::{Employee, EmployeeId, EmployeePatch, EmployeeWithDepartment};
pub use model::ModelValidationError;
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::{Entity, RepoError, RepoResult};
pub use service::store::{OpenMode, Store};

/// Default table file, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "accessdb.sqlite3";

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
