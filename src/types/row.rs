//! Result shapes returned by executors.
//!
//! Drivers convert their native rows into these types so generated decode
//! routines work against any `Executor`.

use crate::types::error::{DatabaseError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Positional query argument.
pub type Arg = serde_json::Value;

/// Single result row: column names paired with values, in projection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Arg>,
}

impl Row {
    /// Create a row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DecodeError` if column and value counts differ
    pub fn new(columns: Vec<String>, values: Vec<Arg>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(DatabaseError::DecodeError(format!(
                "row has {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value at position `idx`.
    pub fn get(&self, idx: usize) -> Option<&Arg> {
        self.values.get(idx)
    }

    /// Value of the named column.
    pub fn get_by_name(&self, column: &str) -> Option<&Arg> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Decode the row into a typed struct, matching fields by column name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DecodeError` if a column is missing or has the wrong type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let object: serde_json::Map<String, Arg> = self
            .columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect();

        serde_json::from_value(Arg::Object(object))
            .map_err(|e| DatabaseError::DecodeError(e.to_string()))
    }
}

/// Multi-row result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rows {
    rows: Vec<Row>,
}

impl Rows {
    /// Wrap driver rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Decode every row into `T`, preserving order.
    pub fn decode_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.rows.iter().map(Row::decode).collect()
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// Result of a single-row query.
///
/// Carries its error instead of returning it, so `query_row` has no error
/// channel of its own. The error surfaces when the row is consumed.
#[derive(Debug)]
pub struct SingleRow {
    inner: Result<Option<Row>>,
}

impl SingleRow {
    /// Row (or absence of one) returned by the driver.
    pub fn new(row: Option<Row>) -> Self {
        Self { inner: Ok(row) }
    }

    /// Deferred failure.
    pub fn from_error(err: DatabaseError) -> Self {
        Self { inner: Err(err) }
    }

    /// Peek at the deferred error, if any.
    pub fn error(&self) -> Option<&DatabaseError> {
        self.inner.as_ref().err()
    }

    /// Take the row.
    ///
    /// # Errors
    ///
    /// Returns the deferred error, or `DatabaseError::NoRows` if nothing matched
    pub fn into_result(self) -> Result<Row> {
        self.inner?.ok_or(DatabaseError::NoRows)
    }

    /// Take the row and decode it into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        self.into_result()?.decode()
    }
}

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    /// Rows inserted, updated or deleted
    pub rows_affected: u64,

    /// Auto-increment id generated by an insert, if the driver reports one
    pub last_insert_id: Option<i64>,
}

/// Driver handle for a compiled statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedStatement {
    /// Driver-assigned handle id
    pub id: Uuid,

    /// Statement text the handle was compiled from
    pub sql: String,
}

impl PreparedStatement {
    /// Create a handle with a fresh id.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sql: sql.into(),
        }
    }
}
