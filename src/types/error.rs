//! Error types for dynamic query operations.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` implementations.

use thiserror::Error;

/// Error type for parsing, rendering and executing dynamic queries.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Canonical statement did not match the `SELECT ... FROM ...` shape
    #[error("SQL parsing failed: {0}")]
    ParseError(String),

    /// Select skeleton could not be rendered to executable SQL
    #[error("Query rendering failed: {0}")]
    RenderError(String),

    /// Single-record lookup returned no rows
    #[error("no rows in result set")]
    NoRows,

    /// Query execution failed in the wrapped executor
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Row could not be decoded into the target type
    #[error("Row decoding failed: {0}")]
    DecodeError(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DatabaseError {
    /// Create a parse error with context.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a render error with context.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderError(msg.into())
    }

    /// Create a query error with context.
    ///
    /// # Arguments
    ///
    /// * `msg` - Error message
    ///
    /// # Returns
    ///
    /// `DatabaseError::QueryError`
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Check if error means "nothing matched".
    ///
    /// # Returns
    ///
    /// `true` for `NoRows`, `false` otherwise
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoRows)
    }
}

/// Result type alias for dynamic query operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
