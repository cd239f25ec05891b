//! Predicate-based filtering for select skeletons
//!
//! Provides SQL predicates that can be combined and rendered to parameterized SQL.

use crate::builder::placeholder::SqlWriter;
use crate::types::{Arg, Result};
use serde::{Deserialize, Serialize};

/// Predicate for a `WHERE` clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    // Comparison operations
    /// field = value (`IS NULL` when value is null)
    Eq(String, Arg),
    /// field <> value (`IS NOT NULL` when value is null)
    Ne(String, Arg),
    /// field > value
    Gt(String, Arg),
    /// field >= value
    Gte(String, Arg),
    /// field < value
    Lt(String, Arg),
    /// field <= value
    Lte(String, Arg),

    // Set operations
    /// field IN [values]
    In(String, Vec<Arg>),
    /// field NOT IN [values]
    NotIn(String, Vec<Arg>),

    // String operations
    /// field LIKE pattern
    Like(String, String),
    /// field NOT LIKE pattern
    NotLike(String, String),

    // Logical operations
    /// pred1 AND pred2 AND ...
    And(Vec<Predicate>),
    /// pred1 OR pred2 OR ...
    Or(Vec<Predicate>),
    /// NOT pred
    Not(Box<Predicate>),

    // Existence checks
    /// field IS NOT NULL
    Exists(String),
    /// field IS NULL
    NotExists(String),

    /// Hand-written SQL; each `?` binds the next argument. `??` binds nothing: it
    /// renders as `??` with `?` placeholders and as a literal `?` with `$n`
    Raw(String, Vec<Arg>),

    // Always true/false (for composition)
    All,
    None,
}

impl Predicate {
    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::Gte(field.into(), value.into())
    }

    /// `field IS NULL`
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::NotExists(field.into())
    }

    /// Raw SQL fragment with bound arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use percolate_dynsql::builder::{Predicate, SelectBuilder};
    /// use serde_json::json;
    ///
    /// let (sql, args) = SelectBuilder::new()
    ///     .select(["id"])
    ///     .from("users")
    ///     .filter(Predicate::raw("age BETWEEN ? AND ?", vec![json!(18), json!(65)]))
    ///     .to_sql()
    ///     .unwrap();
    /// assert_eq!(sql, "SELECT id FROM users WHERE age BETWEEN ? AND ?");
    /// assert_eq!(args.len(), 2);
    /// ```
    pub fn raw(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Self::Raw(sql.into(), args)
    }

    /// Render into `w`, binding values as placeholders.
    pub(crate) fn render(&self, w: &mut SqlWriter) -> Result<()> {
        match self {
            Predicate::Eq(field, Arg::Null) => push_unary(w, field, "IS NULL"),
            Predicate::Eq(field, value) => push_binary(w, field, "=", value),
            Predicate::Ne(field, Arg::Null) => push_unary(w, field, "IS NOT NULL"),
            Predicate::Ne(field, value) => push_binary(w, field, "<>", value),
            Predicate::Gt(field, value) => push_binary(w, field, ">", value),
            Predicate::Gte(field, value) => push_binary(w, field, ">=", value),
            Predicate::Lt(field, value) => push_binary(w, field, "<", value),
            Predicate::Lte(field, value) => push_binary(w, field, "<=", value),
            // Empty sets: IN () is invalid SQL, so match nothing / everything.
            Predicate::In(_, values) if values.is_empty() => w.push_str("(1=0)"),
            Predicate::In(field, values) => push_list(w, field, "IN", values),
            Predicate::NotIn(_, values) if values.is_empty() => w.push_str("(1=1)"),
            Predicate::NotIn(field, values) => push_list(w, field, "NOT IN", values),
            Predicate::Like(field, pattern) => {
                push_binary(w, field, "LIKE", &Arg::String(pattern.clone()))
            }
            Predicate::NotLike(field, pattern) => {
                push_binary(w, field, "NOT LIKE", &Arg::String(pattern.clone()))
            }
            Predicate::And(predicates) => return render_conjunction(w, predicates, "AND", "(1=1)"),
            Predicate::Or(predicates) => return render_conjunction(w, predicates, "OR", "(1=0)"),
            Predicate::Not(predicate) => {
                w.push_str("NOT (");
                predicate.render(w)?;
                w.push_str(")");
            }
            Predicate::Exists(field) => push_unary(w, field, "IS NOT NULL"),
            Predicate::NotExists(field) => push_unary(w, field, "IS NULL"),
            Predicate::Raw(sql, args) => return w.push_raw(sql, args),
            Predicate::All => w.push_str("(1=1)"),
            Predicate::None => w.push_str("(1=0)"),
        }
        Ok(())
    }
}

fn push_unary(w: &mut SqlWriter, field: &str, op: &str) {
    w.push_str(field);
    w.push_str(" ");
    w.push_str(op);
}

fn push_binary(w: &mut SqlWriter, field: &str, op: &str, value: &Arg) {
    push_unary(w, field, op);
    w.push_str(" ");
    w.bind(value.clone());
}

fn push_list(w: &mut SqlWriter, field: &str, op: &str, values: &[Arg]) {
    push_unary(w, field, op);
    w.push_str(" (");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            w.push_str(",");
        }
        w.bind(value.clone());
    }
    w.push_str(")");
}

fn render_conjunction(
    w: &mut SqlWriter,
    predicates: &[Predicate],
    joiner: &str,
    empty: &str,
) -> Result<()> {
    match predicates {
        [] => w.push_str(empty),
        [single] => single.render(w)?,
        many => {
            w.push_str("(");
            for (i, predicate) in many.iter().enumerate() {
                if i > 0 {
                    w.push_str(" ");
                    w.push_str(joiner);
                    w.push_str(" ");
                }
                predicate.render(w)?;
            }
            w.push_str(")");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PlaceholderFormat;
    use serde_json::json;

    fn render(pred: &Predicate) -> (String, Vec<Arg>) {
        let mut w = SqlWriter::new(PlaceholderFormat::Question);
        pred.render(&mut w).unwrap();
        w.finish()
    }

    #[test]
    fn test_eq_predicate() {
        let (sql, args) = render(&Predicate::Eq("status".to_string(), json!("active")));
        assert_eq!(sql, "status = ?");
        assert_eq!(args, vec![json!("active")]);
    }

    #[test]
    fn test_null_comparisons() {
        assert_eq!(render(&Predicate::eq("deleted_at", Arg::Null)).0, "deleted_at IS NULL");
        assert_eq!(
            render(&Predicate::Ne("deleted_at".to_string(), Arg::Null)).0,
            "deleted_at IS NOT NULL"
        );
        assert!(render(&Predicate::is_null("deleted_at")).1.is_empty());
    }

    #[test]
    fn test_gt_predicate() {
        let (sql, args) = render(&Predicate::Gt("age".to_string(), json!(18)));
        assert_eq!(sql, "age > ?");
        assert_eq!(args, vec![json!(18)]);
    }

    #[test]
    fn test_and_predicate() {
        let pred = Predicate::And(vec![
            Predicate::Eq("status".to_string(), json!("active")),
            Predicate::Gt("age".to_string(), json!(18)),
        ]);
        let (sql, args) = render(&pred);
        assert_eq!(sql, "(status = ? AND age > ?)");
        assert_eq!(args, vec![json!("active"), json!(18)]);
    }

    #[test]
    fn test_or_inside_not() {
        let pred = Predicate::Not(Box::new(Predicate::Or(vec![
            Predicate::Exists("a".to_string()),
            Predicate::Lte("b".to_string(), json!(2)),
        ])));
        assert_eq!(render(&pred).0, "NOT ((a IS NOT NULL OR b <= ?))");
    }

    #[test]
    fn test_in_predicate() {
        let pred = Predicate::In("status".to_string(), vec![json!("active"), json!("pending")]);
        let (sql, args) = render(&pred);
        assert_eq!(sql, "status IN (?,?)");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_empty_sets_and_conjunctions() {
        assert_eq!(render(&Predicate::In("a".to_string(), vec![])).0, "(1=0)");
        assert_eq!(render(&Predicate::NotIn("a".to_string(), vec![])).0, "(1=1)");
        assert_eq!(render(&Predicate::And(vec![])).0, "(1=1)");
        assert_eq!(render(&Predicate::Or(vec![])).0, "(1=0)");
        assert_eq!(render(&Predicate::And(vec![Predicate::All])).0, "(1=1)");
    }

    #[test]
    fn test_like_binds_pattern() {
        let (sql, args) = render(&Predicate::Like("email".to_string(), "%@example.com".to_string()));
        assert_eq!(sql, "email LIKE ?");
        assert_eq!(args, vec![json!("%@example.com")]);
    }
}
