//! Numbered menu actions.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One menu entry; the number shown to the user is its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InsertDepartment,
    UpdateDepartment,
    DeleteDepartment,
    ListDepartments,
    InsertEmployee,
    UpdateEmployee,
    DeleteEmployee,
    ListEmployees,
    ListJoin,
    Exit,
}

impl Command {
    /// Menu order.
    pub const ALL: [Command; 10] = [
        Command::InsertDepartment,
        Command::UpdateDepartment,
        Command::DeleteDepartment,
        Command::ListDepartments,
        Command::InsertEmployee,
        Command::UpdateEmployee,
        Command::DeleteEmployee,
        Command::ListEmployees,
        Command::ListJoin,
        Command::Exit,
    ];

    pub fn number(self) -> i64 {
        match self {
            Command::InsertDepartment => 1,
            Command::UpdateDepartment => 2,
            Command::DeleteDepartment => 3,
            Command::ListDepartments => 4,
            Command::InsertEmployee => 5,
            Command::UpdateEmployee => 6,
            Command::DeleteEmployee => 7,
            Command::ListEmployees => 8,
            Command::ListJoin => 9,
            Command::Exit => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::InsertDepartment => "Insert department",
            Command::UpdateDepartment => "Update department",
            Command::DeleteDepartment => "Delete department",
            Command::ListDepartments => "List departments",
            Command::InsertEmployee => "Insert employee",
            Command::UpdateEmployee => "Update employee",
            Command::DeleteEmployee => "Delete employee",
            Command::ListEmployees => "List employees",
            Command::ListJoin => "List employees with department name",
            Command::Exit => "Exit",
        }
    }

    pub fn from_number(number: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.number() == number)
    }
}

/// Rejected menu selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    NotANumber(String),
    OutOfRange(i64),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber(input) => write!(f, "`{input}` is not a menu number"),
            Self::OutOfRange(number) => write!(
                f,
                "{number} is not a menu option; choose 1-{}",
                Command::ALL.len()
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

impl FromStr for Command {
    type Err = SelectionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let number = trimmed
            .parse::<i64>()
            .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;
        Self::from_number(number).ok_or(SelectionError::OutOfRange(number))
    }
}
