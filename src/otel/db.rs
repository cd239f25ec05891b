//! Executor call instrumentation.
//!
//! Implements OpenTelemetry semantic conventions for intercepted SQL calls.

use tracing::field::Empty;
use tracing::{span, Level, Span};

/// Executor primitives (maps to `db.operation.name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOperation {
    /// Compile a statement
    Prepare,
    /// Statement without row results
    Exec,
    /// Multi-row query
    Query,
    /// At-most-one-row query
    QueryRow,
}

impl DbOperation {
    /// Get operation name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Exec => "exec",
            Self::Query => "query",
            Self::QueryRow => "query_row",
        }
    }
}

/// What an interceptor did with a call (maps to `db.intercept.action`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptAction {
    /// Caller's statement forwarded unchanged
    Passthrough,
    /// Statement and args replaced by the rendered skeleton
    Override,
    /// Rendering failed and the caller's statement was forwarded instead
    Fallback,
}

impl InterceptAction {
    /// Get action name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Override => "override",
            Self::Fallback => "fallback",
        }
    }
}

/// Create a span for one executor call.
///
/// # Arguments
///
/// * `operation` - Executor primitive
/// * `query_text` - Statement text supplied by the caller
/// * `namespace` - Tenant or database name (optional)
///
/// # Returns
///
/// Tracing span; `db.collection.name`, `db.intercept.action` and
/// `db.response.returned_rows` are recorded later
///
/// # Example
///
/// ```rust,ignore
/// let span = db_query_span(DbOperation::Query, sql, ctx.namespace());
/// record_intercept(&span, InterceptAction::Override, Some("users"));
/// ```
pub fn db_query_span(operation: DbOperation, query_text: &str, namespace: Option<&str>) -> Span {
    let span = span!(
        Level::INFO,
        "db.query",
        otel.name = %format!("{} dynsql", operation.as_str()),
        otel.kind = "client",
        db.system.name = "sql",
        db.operation.name = operation.as_str(),
        db.query.text = query_text,
        db.collection.name = Empty,
        db.namespace = Empty,
        db.intercept.action = Empty,
        db.response.returned_rows = Empty,
    );

    if let Some(ns) = namespace {
        span.record("db.namespace", ns);
    }

    span
}

/// Record the interception decision on `span`.
pub fn record_intercept(span: &Span, action: InterceptAction, collection: Option<&str>) {
    span.record("db.intercept.action", action.as_str());
    if let Some(coll) = collection {
        span.record("db.collection.name", coll);
    }
}

/// Record the number of rows a query returned.
pub fn record_returned_rows(span: &Span, rows: usize) {
    span.record("db.response.returned_rows", rows);
}
