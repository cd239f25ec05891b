//! Tracing instrumentation for executor calls.
//!
//! Follows OpenTelemetry semantic conventions for database operations:
//! - https://opentelemetry.io/docs/specs/semconv/database/database-spans/
//!
//! **Span naming**: `{db.operation.name} dynsql`
//!
//! **Attributes**:
//! - `db.operation.name`: `prepare`, `exec`, `query`, `query_row`
//! - `db.query.text`: statement supplied by the caller
//! - `db.collection.name`: skeleton table, when the call was overridden
//! - `db.namespace`: tenant from the `QueryContext`
//! - `db.intercept.action`: `passthrough`, `override` or `fallback`

pub mod db;

pub use db::{db_query_span, record_intercept, record_returned_rows, DbOperation, InterceptAction};
