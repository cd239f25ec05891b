//! Select skeleton builder
//!
//! Fluent, value-semantics builder for single-table SELECT statements. Every
//! refinement consumes the builder and returns a new one, so a base skeleton
//! can be cloned and customized per call without touching the original.

use super::placeholder::{PlaceholderFormat, SqlWriter};
use super::predicates::Predicate;
use crate::parser;
use crate::types::{Arg, DatabaseError, Result};
use serde::{Deserialize, Serialize};

/// Sort order for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    /// SQL keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Select skeleton: table, columns, predicates, ordering and pagination.
///
/// # Example
///
/// ```rust
/// use percolate_dynsql::builder::{Order, Predicate, SelectBuilder};
/// use serde_json::json;
///
/// let (sql, args) = SelectBuilder::new()
///     .select(["id", "name"])
///     .from("users")
///     .filter(Predicate::Gte("age".into(), json!(18)))
///     .order_by("created_at", Order::Desc)
///     .limit(10)
///     .to_sql()
///     .unwrap();
///
/// assert_eq!(sql, "SELECT id, name FROM users WHERE age >= ? ORDER BY created_at DESC LIMIT 10");
/// assert_eq!(args, vec![json!(18)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectBuilder {
    pub columns: Vec<String>,
    pub table: String,
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub placeholder: PlaceholderFormat,
}

impl SelectBuilder {
    /// Create an empty skeleton (renders only once table and columns are set)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a skeleton from a canonical statement without checking the parse.
    ///
    /// A statement that does not parse produces a skeleton with no table and no
    /// columns, which fails at `to_sql`.
    pub fn from_statement(stmt: &str) -> Self {
        let meta = parser::parse(stmt);
        Self::new().select(meta.columns).from(meta.table)
    }

    /// Build a skeleton from a canonical statement.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ParseError` if the statement has no table or no columns
    pub fn from_canonical(stmt: &str) -> Result<Self> {
        let meta = parser::parse(stmt);
        if meta.table.is_empty() || meta.columns.is_empty() {
            return Err(DatabaseError::parse(format!(
                "expected 'SELECT <columns> FROM <table>', got: {}",
                stmt.trim()
            )));
        }
        Ok(Self::new().select(meta.columns).from(meta.table))
    }

    /// Replace the projected columns.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append projected columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Set the source table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Add a `WHERE` predicate (combined with existing predicates using AND)
    ///
    /// # Example
    ///
    /// ```rust
    /// use percolate_dynsql::builder::{Predicate, SelectBuilder};
    /// use serde_json::json;
    ///
    /// let sb = SelectBuilder::new()
    ///     .filter(Predicate::Eq("status".into(), json!("active")))
    ///     .filter(Predicate::Gt("age".into(), json!(18)));
    /// assert_eq!(sb.predicates.len(), 2);
    /// ```
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append an ordering term.
    pub fn order_by(self, field: impl AsRef<str>, order: Order) -> Self {
        let expr = format!("{} {}", field.as_ref(), order.as_str());
        self.order_by_expr(expr)
    }

    /// Append a raw ordering expression, e.g. `"created_at DESC"`.
    pub fn order_by_expr(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(expr.into());
        self
    }

    /// Limit the number of results (replaces any earlier limit)
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Drop the row cap.
    pub fn remove_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Skip the first N results (for pagination)
    ///
    /// # Example
    ///
    /// ```rust
    /// use percolate_dynsql::builder::SelectBuilder;
    ///
    /// let sb = SelectBuilder::new()
    ///     .limit(100)
    ///     .offset(200); // Page 3 (skip first 200, take next 100)
    /// assert_eq!(sb.offset, Some(200));
    /// ```
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Choose the bind parameter syntax.
    pub fn placeholder(mut self, format: PlaceholderFormat) -> Self {
        self.placeholder = format;
        self
    }

    /// Render to statement text and positional arguments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::RenderError` if the table or column list is empty,
    /// or a raw predicate's placeholders don't match its arguments
    pub fn to_sql(&self) -> Result<(String, Vec<Arg>)> {
        if self.table.is_empty() {
            return Err(DatabaseError::render("select statements must specify a table"));
        }
        if self.columns.is_empty() {
            return Err(DatabaseError::render(
                "select statements must have at least one result column",
            ));
        }

        let mut w = SqlWriter::new(self.placeholder);
        w.push_str("SELECT ");
        w.push_str(&self.columns.join(", "));
        w.push_str(" FROM ");
        w.push_str(&self.table);

        for (i, predicate) in self.predicates.iter().enumerate() {
            w.push_str(if i == 0 { " WHERE " } else { " AND " });
            predicate.render(&mut w)?;
        }

        if !self.order_by.is_empty() {
            w.push_str(" ORDER BY ");
            w.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            w.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            w.push_str(&format!(" OFFSET {}", offset));
        }

        Ok(w.finish())
    }
}
