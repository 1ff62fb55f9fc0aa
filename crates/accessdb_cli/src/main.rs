//! Console entry point for the Department/Employee table file.
//!
//! # Responsibility
//! - Parse flags, start file logging, open the store.
//! - Run the menu loop and close the store exactly once on the way out.

mod command;
mod config;
mod prompt;
mod session;

use accessdb_core::{core_version, logging_status, DbError, OpenMode, Store};
use clap::Parser;
use config::Config;
use log::{error, info};
use prompt::Prompter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(err) = config.init_logging() {
        eprintln!("warning: file logging disabled: {err}");
    }
    if let Some((level, log_dir)) = logging_status() {
        info!(
            "event=app_start module=cli status=ok version={} core_version={} log_level={level} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            core_version(),
            log_dir.display()
        );
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_app(&config, stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Failure that ends the program with a non-zero exit code.
#[derive(Debug)]
enum AppError {
    /// The table file could not be opened or created; the menu never ran.
    Open { path: PathBuf, source: DbError },
    /// Reading the menu input or writing to the terminal failed.
    Terminal(io::Error),
    Close(DbError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => write!(
                f,
                "Error opening or creating the database `{}`: {source}",
                path.display()
            ),
            Self::Terminal(err) => write!(f, "Terminal error: {err}"),
            Self::Close(err) => write!(f, "Error closing the database: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Terminal(err) => Some(err),
            Self::Close(err) => Some(err),
        }
    }
}

/// Opens the store, runs the menu over `input`/`output` and closes the store.
///
/// # Errors
/// - `Open` before any menu output when the file cannot be opened or created.
/// - `Terminal` when the session's I/O fails; the store is still closed.
/// - `Close` when releasing the file fails after a clean session.
fn run_app<R: BufRead, W: Write>(
    config: &Config,
    input: R,
    output: &mut W,
) -> Result<(), AppError> {
    let store = Store::open(&config.db).map_err(|source| AppError::Open {
        path: config.db.clone(),
        source,
    })?;

    let mut outcome = announce(store.mode(), &config.db, output);
    if outcome.is_ok() {
        let mut prompter = Prompter::new(input, &mut *output);
        outcome = session::run(&store, &mut prompter);
    }
    let outcome = outcome.and_then(|()| writeln!(output, "Closing connection"));
    let closed = store.close();

    outcome.map_err(AppError::Terminal)?;
    closed.map_err(AppError::Close)
}

fn announce(mode: OpenMode, path: &Path, output: &mut impl Write) -> io::Result<()> {
    match mode {
        OpenMode::Attached => writeln!(output, "Connected to database {}", path.display()),
        OpenMode::Created => writeln!(output, "Database created at {}", path.display()),
        OpenMode::InMemory => Ok(()),
    }
}
