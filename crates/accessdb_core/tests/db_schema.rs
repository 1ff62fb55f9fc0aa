use accessdb_core::db::migrations::latest_version;
use accessdb_core::db::{open_db, open_db_in_memory, open_db_tracked, DbError};
use accessdb_core::{
    Department, OpenMode, RepoError, SqliteDepartmentRepository, SqliteEmployeeRepository, Store,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_defines_both_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_object_exists(&conn, "table", "departments");
    assert_object_exists(&conn, "table", "employees");
    assert_object_exists(&conn, "index", "idx_departments_name");
    assert_object_exists(&conn, "index", "idx_employees_department_id");
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn employees_reference_departments_with_cascades() {
    let conn = open_db_in_memory().unwrap();
    let (table, on_update, on_delete): (String, String, String) = conn
        .query_row(
            "SELECT \"table\", on_update, on_delete FROM pragma_foreign_key_list('employees');",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();

    assert_eq!(table, "departments");
    assert_eq!(on_update, "CASCADE");
    assert_eq!(on_delete, "CASCADE");
}

#[test]
fn store_creates_then_attaches_without_redefining_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accessdb.sqlite3");

    let store = Store::open(&path).unwrap();
    assert_eq!(store.mode(), OpenMode::Created);
    store.insert_department(&Department::new(1, "Ventas")).unwrap();
    store.close().unwrap();

    let store = Store::open(&path).unwrap();
    assert_eq!(store.mode(), OpenMode::Attached);
    assert_eq!(
        store.find_department(1).unwrap(),
        Some(Department::new(1, "Ventas"))
    );
    store.close().unwrap();
}

#[test]
fn empty_existing_file_is_reported_as_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.sqlite3");
    std::fs::File::create(&path).unwrap();

    let store = Store::open(&path).unwrap();

    assert_eq!(store.mode(), OpenMode::Created);
    store.insert_department(&Department::new(1, "Ventas")).unwrap();
    store.close().unwrap();

    assert_eq!(Store::open(&path).unwrap().mode(), OpenMode::Attached);
}

#[test]
fn tracked_open_reports_schema_creation_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracked.sqlite3");

    let (conn, created) = open_db_tracked(&path).unwrap();
    assert!(created);
    drop(conn);

    let (conn, created) = open_db_tracked(&path).unwrap();
    assert!(!created);
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn dropping_store_without_close_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.sqlite3");

    {
        let store = Store::open(&path).unwrap();
        store.insert_department(&Department::new(4, "Compras")).unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(store.list_departments().unwrap().len(), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match Store::open(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected unsupported schema version"),
    }
}

#[test]
fn opening_unreadable_path_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("accessdb.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteDepartmentRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_employees_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteEmployeeRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("employees"))
    ));
}

#[test]
fn repository_rejects_employees_table_missing_salary() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE employees (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            department_id INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteEmployeeRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "employees",
            column: "salary"
        })
    ));
}

#[test]
fn store_open_rejects_file_with_version_but_no_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hollow.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    assert!(matches!(
        Store::open(&path),
        Err(DbError::IncompatibleSchema(_))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
