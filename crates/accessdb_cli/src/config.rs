//! Command-line configuration.

use accessdb_core::{default_log_level, init_logging, DEFAULT_DB_FILE};
use clap::Parser;
use std::io;
use std::path::PathBuf;

/// Department/Employee CRUD console over a single table file.
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Config {
    /// Table file to open; created with both tables when missing.
    #[clap(long, default_value = DEFAULT_DB_FILE)]
    pub db: PathBuf,

    /// Directory for rolling log files, relative to the working directory unless absolute.
    #[clap(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[clap(long)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn absolute_log_dir(&self) -> io::Result<PathBuf> {
        if self.log_dir.is_absolute() {
            return Ok(self.log_dir.clone());
        }
        Ok(std::env::current_dir()?.join(&self.log_dir))
    }

    pub fn init_logging(&self) -> Result<(), String> {
        let log_dir = self
            .absolute_log_dir()
            .map_err(|err| format!("cannot resolve log directory: {err}"))?;
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log directory `{}` is not UTF-8", log_dir.display()))?;
        init_logging(self.log_level(), log_dir)
    }
}
