//! Interactive menu loop dispatching to the store.
//!
//! # Invariants
//! - A failed store call is reported and the loop continues with the next menu.
//! - The loop never closes the store; its owner does, once, after `run` returns.

use crate::command::Command;
use crate::prompt::{PromptError, PromptResult, Prompter};
use accessdb_core::{Department, Employee, EmployeePatch, RepoError, Store};
use log::{debug, info};
use std::io::{self, BufRead, Write};

enum Flow {
    Continue,
    Exit,
}

/// Runs the menu until Exit is chosen or input ends.
///
/// # Errors
/// - Returns terminal I/O failures; store failures never end the loop.
pub fn run<R: BufRead, W: Write>(store: &Store, prompter: &mut Prompter<R, W>) -> io::Result<()> {
    loop {
        render_menu(prompter.output())?;

        let outcome = prompter
            .ask_selection()
            .and_then(|command| execute(store, prompter, command));

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => {
                info!("event=session_end module=cli status=ok reason=exit");
                return Ok(());
            }
            Err(PromptError::Eof) => {
                info!("event=session_end module=cli status=ok reason=eof");
                writeln!(prompter.output())?;
                return Ok(());
            }
            Err(PromptError::Io(err)) => return Err(err),
        }
    }
}

fn render_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    for command in Command::ALL {
        writeln!(out, "{:>2}. {}", command.number(), command.label())?;
    }
    Ok(())
}

fn execute<R: BufRead, W: Write>(
    store: &Store,
    prompter: &mut Prompter<R, W>,
    command: Command,
) -> PromptResult<Flow> {
    debug!("event=menu_select module=cli option={}", command.number());

    match command {
        Command::InsertDepartment => insert_department(store, prompter)?,
        Command::UpdateDepartment => update_department(store, prompter)?,
        Command::DeleteDepartment => delete_department(store, prompter)?,
        Command::ListDepartments => list_departments(store, prompter.output())?,
        Command::InsertEmployee => insert_employee(store, prompter)?,
        Command::UpdateEmployee => update_employee(store, prompter)?,
        Command::DeleteEmployee => delete_employee(store, prompter)?,
        Command::ListEmployees => list_employees(store, prompter.output())?,
        Command::ListJoin => list_join(store, prompter.output())?,
        Command::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

fn insert_department<R: BufRead, W: Write>(
    store: &Store,
    prompter: &mut Prompter<R, W>,
) -> PromptResult<()> {
    let id = prompter.ask_i64("Department id")?;
    let name = prompter.ask_text("Name")?;

    let out = prompter.output();
    match store.insert_department(&Department::new(id, name)) {
        Ok(id) => writeln!(out, "Department {id} inserted.")?,
        Err(err) => report(out, &err)?,
    }
    Ok(())
}

fn update_department<R: BufRead, W: Write>(
    store: &Store,
    prompter: &mut Prompter<R, W>,
) -> PromptResult<()> {
    let id = prompter.ask_i64("Department id")?;
    let current = match store.find_department(id) {
        Ok(Some(department)) => department,
        Ok(None) => return not_found(prompter.output(), "department", id),
        Err(err) => return report(prompter.output(), &err),
    };

    writeln!(prompter.output(), "Current name: {}", current.name)?;
    let name = prompter.ask_text("New name")?;

    let out = prompter.output();
    match store.update_department(&Department::new(id, name)) {
        Ok(()) => writeln!(out, "Department {id} updated.")?,
        Err(err) => report(out, &err)?,
    }
    Ok(())
}

fn delete_department<R: BufRead, W: Write>(
    store: &Store,
    prompter: &mut Prompter<R, W>,
) -> PromptResult<()> {
    let id = prompter.ask_i64("Department id")?;

    let out = prompter.output();
    match store.delete_department(id) {
        Ok(cascaded) => writeln!(
            out,
            "Department {id} deleted ({cascaded} employee(s) removed with it)."
        )?,
        Err(err) => report(out, &err)?,
    }
    Ok(())
}

fn list_departments(store: &Store, out: &mut impl Write) -> PromptResult<()> {
    let departments = match store.list_departments() {
        Ok(departments) => departments,
        Err(err) => return report(out, &err),
    };

    if departments.is_empty() {
        writeln!(out, "No departments.")?;
        return Ok(());
    }
    writeln!(out, "{:>6}  {}", "ID", "NAME")?;
    for department in departments {
        writeln!(out, "{:>6}  {}", department.id, department.name)?;
    }
    Ok(())
}

fn insert_employee<R: BufRead, W: Write>(
    store: &Store,
    prompter: &mut Prompter<R, W>,
) -> PromptResult<()> {
    let id = prompter.ask_i64("Employee id")?;
    let name = prompter.ask_text("Name")?;
    let role = prompter.ask_text("Role")?;
    let salary = prompter.ask_amount("Salary")?;
    let department_id = prompter.ask_i64("Department id")?;

    let employee = Employee::new(id, name, role, salary, department_id);
    let out = prompter.output();
    match store.insert_employee(&employee) {
        Ok(id) => writeln!(out, "Employee {id} inserted.")?,
        Err(err) => report(out, &err)?,
    }
    Ok(())
}

fn update_employee<R: BufRead, W: Write>(
    store: &Store,
    prompter: &mut Prompter<R, W>,
) -> PromptResult<()> {
    let id = prompter.ask_i64("Employee id")?;
    let current = match store.find_employee(id) {
        Ok(Some(employee)) => employee,
        Ok(None) => return not_found(prompter.output(), "employee", id),
        Err(err) => return report(prompter.output(), &err),
    };

    writeln!(prompter.output(), "Leave blank to keep the current value.")?;
    let patch = EmployeePatch {
        name: prompter.ask_optional_text(&format!("Name [{}]", current.name))?,
        role: prompter.ask_optional_text(&format!("Role [{}]", current.role))?,
        salary: prompter.ask_optional_amount(&format!("Salary [{}]", current.salary))?,
        department_id: prompter
            .ask_optional_i64(&format!("Department id [{}]", current.department_id))?,
    };

    let out = prompter.output();
    if patch.is_empty() {
        writeln!(out, "Nothing to change.")?;
        return Ok(());
    }
    match store.patch_employee(id, &patch) {
        Ok(_) => writeln!(out, "Employee {id} updated.")?,
        Err(err) => report(out, &err)?,
    }
    Ok(())
}

fn delete_employee<R: BufRead, W: Write>(
    store: &Store,
    prompter: &mut Prompter<R, W>,
) -> PromptResult<()> {
    let id = prompter.ask_i64("Employee id")?;

    let out = prompter.output();
    match store.delete_employee(id) {
        Ok(()) => writeln!(out, "Employee {id} deleted.")?,
        Err(err) => report(out, &err)?,
    }
    Ok(())
}

fn list_employees(store: &Store, out: &mut impl Write) -> PromptResult<()> {
    let employees = match store.list_employees() {
        Ok(employees) => employees,
        Err(err) => return report(out, &err),
    };

    if employees.is_empty() {
        writeln!(out, "No employees.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:>6}  {:<20} {:<16} {:>12}  {:>6}",
        "ID", "NAME", "ROLE", "SALARY", "DEPT"
    )?;
    for employee in employees {
        writeln!(
            out,
            "{:>6}  {:<20} {:<16} {:>12}  {:>6}",
            employee.id, employee.name, employee.role, employee.salary, employee.department_id
        )?;
    }
    Ok(())
}

fn list_join(store: &Store, out: &mut impl Write) -> PromptResult<()> {
    let rows = match store.list_employees_with_department_name() {
        Ok(rows) => rows,
        Err(err) => return report(out, &err),
    };

    if rows.is_empty() {
        writeln!(out, "No employees.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:>6}  {:<20} {:<16} {:>12}  {}",
        "ID", "NAME", "ROLE", "SALARY", "DEPARTMENT"
    )?;
    for row in rows {
        let employee = &row.employee;
        writeln!(
            out,
            "{:>6}  {:<20} {:<16} {:>12}  {}",
            employee.id, employee.name, employee.role, employee.salary, row.department_name
        )?;
    }
    Ok(())
}

fn not_found(out: &mut impl Write, entity: &str, id: i64) -> PromptResult<()> {
    writeln!(out, "No {entity} with id {id}; nothing changed.")?;
    Ok(())
}

fn report(out: &mut impl Write, err: &RepoError) -> PromptResult<()> {
    match err {
        RepoError::NotFound { entity, id } => {
            writeln!(out, "No {entity} with id {id}; nothing changed.")?
        }
        other => writeln!(out, "Error: {other}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::prompt::Prompter;
    use accessdb_core::{Department, Employee, Store};
    use rust_decimal::Decimal;
    use std::io::Cursor;
    use std::str::FromStr;

    fn run_script(store: &Store, script: &str) -> String {
        let mut prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        run(store, &mut prompter).unwrap();
        String::from_utf8(prompter.into_output()).unwrap()
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn inserts_and_lists_departments_in_id_order() {
        let store = Store::open_in_memory().unwrap();

        let output = run_script(&store, "1\n3\nC\n1\n1\nA\n4\n10\n");

        assert!(output.contains("Department 3 inserted."));
        let a = output.find("     1  A").unwrap();
        let c = output.find("     3  C").unwrap();
        assert!(a < c);
        assert_eq!(store.list_departments().unwrap().len(), 2);
    }

    #[test]
    fn malformed_selection_reprompts_instead_of_aborting() {
        let store = Store::open_in_memory().unwrap();

        let output = run_script(&store, "hello\n42\n4\n10\n");

        assert!(output.contains("`hello` is not a menu number, try again."));
        assert!(output.contains("42 is not a menu option"));
        assert!(output.contains("No departments."));
    }

    #[test]
    fn duplicate_insert_is_reported_and_session_continues() {
        let store = Store::open_in_memory().unwrap();
        store.insert_department(&Department::new(1, "Ventas")).unwrap();

        let output = run_script(&store, "1\n1\nOtra\n4\n10\n");

        assert!(output.contains("Error: department already exists: 1"));
        assert!(output.contains("     1  Ventas"));
    }

    #[test]
    fn update_of_missing_department_reports_not_found_without_asking_name() {
        let store = Store::open_in_memory().unwrap();

        let output = run_script(&store, "2\n5\n10\n");

        assert!(output.contains("No department with id 5; nothing changed."));
        assert!(!output.contains("New name"));
    }

    #[test]
    fn employee_with_unknown_department_is_reported() {
        let store = Store::open_in_memory().unwrap();

        let output = run_script(&store, "5\n10\nAna\nClerk\n1000\n9\n10\n");

        assert!(output.contains("Error: department does not exist: 9"));
        assert!(store.list_employees().unwrap().is_empty());
    }

    #[test]
    fn employee_update_keeps_blank_fields() {
        let store = Store::open_in_memory().unwrap();
        store.insert_department(&Department::new(1, "Ventas")).unwrap();
        store
            .insert_employee(&Employee::new(10, "Ana", "Clerk", dec("1000"), 1))
            .unwrap();

        let output = run_script(&store, "6\n10\n\nManager\n\n\n10\n");

        assert!(output.contains("Employee 10 updated."));
        assert_eq!(
            store.find_employee(10).unwrap(),
            Some(Employee::new(10, "Ana", "Manager", dec("1000"), 1))
        );
    }

    #[test]
    fn employee_update_with_all_blank_changes_nothing() {
        let store = Store::open_in_memory().unwrap();
        store.insert_department(&Department::new(1, "Ventas")).unwrap();
        store
            .insert_employee(&Employee::new(10, "Ana", "Clerk", dec("1000"), 1))
            .unwrap();

        let output = run_script(&store, "6\n10\n\n\n\n\n10\n");

        assert!(output.contains("Nothing to change."));
    }

    #[test]
    fn deleting_department_reports_cascade() {
        let store = Store::open_in_memory().unwrap();
        store.insert_department(&Department::new(1, "Sales")).unwrap();
        store
            .insert_employee(&Employee::new(10, "A", "Clerk", dec("1000.00"), 1))
            .unwrap();

        let output = run_script(&store, "3\n1\n8\n10\n");

        assert!(output.contains("Department 1 deleted (1 employee(s) removed with it)."));
        assert!(output.contains("No employees."));
    }

    #[test]
    fn join_listing_shows_department_name() {
        let store = Store::open_in_memory().unwrap();
        store.insert_department(&Department::new(1, "HR")).unwrap();
        store
            .insert_employee(&Employee::new(5, "Bob", "Analyst", dec("2000.00"), 1))
            .unwrap();

        let output = run_script(&store, "9\n10\n");

        let row = output
            .lines()
            .find(|line| line.contains("Bob"))
            .expect("join row should be printed");
        assert!(row.contains("Analyst"));
        assert!(row.contains("2000.00"));
        assert!(row.trim_end().ends_with("HR"));
    }

    #[test]
    fn closed_input_ends_session_cleanly() {
        let store = Store::open_in_memory().unwrap();

        let output = run_script(&store, "1\n7\n");

        assert!(output.contains("Name: "));
        assert!(store.list_departments().unwrap().is_empty());
    }

    #[test]
    fn deleting_missing_employee_reports_not_found() {
        let store = Store::open_in_memory().unwrap();

        let output = run_script(&store, "7\n3\n10\n");

        assert!(output.contains("No employee with id 3; nothing changed."));
    }
}
