//! Placeholder styles and the SQL writer that numbers them.

use crate::types::{Arg, DatabaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bind parameter syntax expected by the target driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderFormat {
    /// `?` (MySQL, SQLite)
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
}

impl PlaceholderFormat {
    /// Format name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Dollar => "dollar",
        }
    }
}

impl fmt::Display for PlaceholderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceholderFormat {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" | "?" => Ok(Self::Question),
            "dollar" | "$" => Ok(Self::Dollar),
            other => Err(DatabaseError::ConfigError(format!(
                "unknown placeholder format '{}' (expected 'question' or 'dollar')",
                other
            ))),
        }
    }
}

/// Accumulates statement text and positional arguments.
#[derive(Debug)]
pub(crate) struct SqlWriter {
    sql: String,
    args: Vec<Arg>,
    format: PlaceholderFormat,
}

impl SqlWriter {
    pub(crate) fn new(format: PlaceholderFormat) -> Self {
        Self {
            sql: String::new(),
            args: Vec::new(),
            format,
        }
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Append a placeholder and record its argument.
    pub(crate) fn bind(&mut self, arg: Arg) {
        self.args.push(arg);
        match self.format {
            PlaceholderFormat::Question => self.sql.push('?'),
            PlaceholderFormat::Dollar => {
                self.sql.push('$');
                self.sql.push_str(&self.args.len().to_string());
            }
        }
    }

    /// Append caller-written SQL whose `?` marks bind `args` in order.
    ///
    /// `??` marks a literal `?` and binds nothing. It stays `??` for
    /// `Question`, where drivers read it as the escape, and becomes `?` for
    /// `Dollar`.
    pub(crate) fn push_raw(&mut self, sql: &str, args: &[Arg]) -> Result<()> {
        let mut args = args.iter();
        let mut chars = sql.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '?' {
                self.sql.push(c);
                continue;
            }
            if chars.peek() == Some(&'?') {
                chars.next();
                match self.format {
                    PlaceholderFormat::Question => self.sql.push_str("??"),
                    PlaceholderFormat::Dollar => self.sql.push('?'),
                }
                continue;
            }
            let arg = args.next().ok_or_else(|| {
                DatabaseError::render(format!("not enough arguments for placeholders in '{}'", sql))
            })?;
            self.bind(arg.clone());
        }

        if args.next().is_some() {
            return Err(DatabaseError::render(format!(
                "too many arguments for placeholders in '{}'",
                sql
            )));
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> (String, Vec<Arg>) {
        (self.sql, self.args)
    }
}
