//! Line-oriented prompting over any reader/writer pair.
//!
//! # Invariants
//! - Malformed answers are reported and asked again; they never end the session.
//! - End of input surfaces as `PromptError::Eof` so callers can shut down cleanly.

use crate::command::Command;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

pub type PromptResult<T> = Result<T, PromptError>;

#[derive(Debug)]
pub enum PromptError {
    /// Input closed before an answer was given.
    Eof,
    Io(io::Error),
}

impl From<io::Error> for PromptError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn ask_selection(&mut self) -> PromptResult<Command> {
        self.ask_parsed("Option", |line| {
            Command::from_str(line).map_err(|err| err.to_string())
        })
    }

    /// Non-blank text, trimmed.
    pub fn ask_text(&mut self, label: &str) -> PromptResult<String> {
        self.ask_parsed(label, parse_text)
    }

    pub fn ask_i64(&mut self, label: &str) -> PromptResult<i64> {
        self.ask_parsed(label, parse_i64)
    }

    /// Non-negative decimal amount.
    pub fn ask_amount(&mut self, label: &str) -> PromptResult<Decimal> {
        self.ask_parsed(label, parse_amount)
    }

    /// Blank answer keeps the current value and yields `None`.
    pub fn ask_optional_text(&mut self, label: &str) -> PromptResult<Option<String>> {
        self.ask_optional(label, parse_text)
    }

    pub fn ask_optional_i64(&mut self, label: &str) -> PromptResult<Option<i64>> {
        self.ask_optional(label, parse_i64)
    }

    pub fn ask_optional_amount(&mut self, label: &str) -> PromptResult<Option<Decimal>> {
        self.ask_optional(label, parse_amount)
    }

    fn ask_parsed<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> PromptResult<T> {
        loop {
            let line = self.read_line(label)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(message) => writeln!(self.output, "{message}, try again.")?,
            }
        }
    }

    fn ask_optional<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> PromptResult<Option<T>> {
        self.ask_parsed(label, |line| {
            if line.trim().is_empty() {
                return Ok(None);
            }
            parse(line).map(Some)
        })
    }

    fn read_line(&mut self, label: &str) -> PromptResult<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

fn parse_text(line: &str) -> Result<String, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err("a value is required".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_i64(line: &str) -> Result<i64, String> {
    let trimmed = line.trim();
    trimmed
        .parse()
        .map_err(|_| format!("`{trimmed}` is not a whole number"))
}

fn parse_amount(line: &str) -> Result<Decimal, String> {
    let trimmed = line.trim();
    let amount =
        Decimal::from_str(trimmed).map_err(|_| format!("`{trimmed}` is not a decimal amount"))?;
    if amount < Decimal::ZERO {
        return Err(format!("`{trimmed}` must not be negative"));
    }
    Ok(amount)
}
