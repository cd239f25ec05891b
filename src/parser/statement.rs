//! Canonical SELECT statement metadata extraction.
//!
//! Recovers the table name and projected columns from statements of the form
//! `SELECT <col-list> FROM <table>[;]`, as emitted by query generators. Only the
//! first `FROM` is considered; joins and subqueries are not understood.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SELECT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*select\s+(.*?)\s+from\s+([^\s;]+)").expect("valid SELECT pattern")
});

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment pattern"));

/// Table and columns recovered from a canonical statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementMeta {
    /// Table name, trailing `;` removed
    pub table: String,

    /// Projected columns in source order, one layer of quoting removed
    pub columns: Vec<String>,
}

impl StatementMeta {
    /// `true` when the statement did not match the expected shape.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty() && self.columns.is_empty()
    }
}

/// Parse a canonical `SELECT ... FROM <table>` statement.
///
/// A statement that does not match yields `StatementMeta::default()`; callers
/// treat that as "no metadata available" rather than an error.
///
/// Commas inside quoted identifiers are not protected: `"a,b"` splits into
/// two tokens.
///
/// # Example
///
/// ```rust
/// use percolate_dynsql::parser::parse;
///
/// let meta = parse("SELECT a, b, c FROM test;");
/// assert_eq!(meta.table, "test");
/// assert_eq!(meta.columns, vec!["a", "b", "c"]);
/// ```
pub fn parse(stmt: &str) -> StatementMeta {
    let stmt = strip_comments(stmt);

    let Some(caps) = SELECT_FROM.captures(&stmt) else {
        return StatementMeta::default();
    };

    let columns = caps[1]
        .split(',')
        .map(|col| unquote(col.trim()))
        .filter(|col| !col.is_empty())
        .map(str::to_string)
        .collect();

    let table = caps[2].trim();
    let table = table.strip_suffix(';').unwrap_or(table).to_string();

    StatementMeta { table, columns }
}

/// Remove `/* ... */` and `--` comments.
///
/// Block comments go first, across the whole text. A `/*` may close at a `*/`
/// on a later line, so multi-line comment headers are removed too. Line
/// comments are then cut per line, unless the `--` sits inside single quotes,
/// double quotes or backticks on that same line. Quote state does not carry
/// across lines.
pub fn strip_comments(stmt: &str) -> String {
    let stmt = BLOCK_COMMENT.replace_all(stmt, "");

    stmt.split('\n')
        .map(|line| match line_comment_start(line) {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset of the first unquoted `--` on a line.
fn line_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut in_backtick = false;

    for i in 0..bytes.len().saturating_sub(1) {
        match bytes[i] {
            b'\'' if !in_double && !in_backtick => in_single = !in_single,
            b'"' if !in_single && !in_backtick => in_double = !in_double,
            b'`' if !in_single && !in_double => in_backtick = !in_backtick,
            b'-' if bytes[i + 1] == b'-' && !in_single && !in_double && !in_backtick => {
                return Some(i);
            }
            _ => {}
        }
    }

    None
}

/// Strip one layer of matching backticks, double quotes or single quotes.
fn unquote(col: &str) -> &str {
    let bytes = col.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'`' | b'"' | b'\'') {
            return &col[1..col.len() - 1];
        }
    }
    col
}
