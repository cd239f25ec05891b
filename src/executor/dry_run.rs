//! Recording executor that never touches a database.
//!
//! Records every call it receives and answers queries with scripted rows.
//! Backs the CLI's `users` command and the interception tests.

use super::{Executor, QueryContext};
use crate::otel::DbOperation;
use crate::types::{Arg, DatabaseError, ExecResult, PreparedStatement, Result, Rows, SingleRow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// One call as received by the dry-run executor.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Primitive that was invoked
    pub operation: DbOperation,
    /// Statement text as received
    pub sql: String,
    /// Arguments as received (empty for `prepare`)
    pub args: Vec<Arg>,
    /// Namespace from the call's context
    pub namespace: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    default_rows: Rows,
    rows_by_sql: HashMap<String, Rows>,
    failure: Option<String>,
}

/// Executor that records calls and returns scripted rows.
///
/// Clones share state, so a test can keep one handle for inspection while
/// another is wrapped by an interceptor.
///
/// A cancelled context fails `exec`, `query` and `query_row` the way a real
/// driver would.
#[derive(Debug, Clone, Default)]
pub struct DryRunExecutor {
    state: Arc<Mutex<State>>,
}

impl DryRunExecutor {
    /// Executor that answers every query with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every query without a specific script with `rows`.
    pub fn with_rows(self, rows: impl Into<Rows>) -> Self {
        self.lock().default_rows = rows.into();
        self
    }

    /// Answer queries whose text is exactly `sql` with `rows`.
    pub fn with_rows_for(self, sql: impl Into<String>, rows: impl Into<Rows>) -> Self {
        self.lock().rows_by_sql.insert(sql.into(), rows.into());
        self
    }

    /// Fail every call with `QueryError(message)`.
    pub fn failing(self, message: impl Into<String>) -> Self {
        self.lock().failure = Some(message.into());
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Most recent call.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.lock().calls.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(
        &self,
        operation: DbOperation,
        ctx: &QueryContext,
        sql: &str,
        args: &[Arg],
    ) -> Result<MutexGuard<'_, State>> {
        debug!(
            operation = operation.as_str(),
            sql,
            args = args.len(),
            "dry-run executor received statement"
        );

        let mut state = self.lock();
        state.calls.push(RecordedCall {
            operation,
            sql: sql.to_string(),
            args: args.to_vec(),
            namespace: ctx.namespace().map(str::to_string),
        });

        if let Some(message) = &state.failure {
            return Err(DatabaseError::query(message.clone()));
        }
        if operation != DbOperation::Prepare && ctx.cancellation_token().is_cancelled() {
            return Err(DatabaseError::query("context canceled"));
        }
        Ok(state)
    }

    fn rows_for(state: &State, sql: &str) -> Rows {
        state
            .rows_by_sql
            .get(sql)
            .unwrap_or(&state.default_rows)
            .clone()
    }
}

#[async_trait]
impl Executor for DryRunExecutor {
    async fn prepare(&self, ctx: &QueryContext, sql: &str) -> Result<PreparedStatement> {
        self.record(DbOperation::Prepare, ctx, sql, &[])?;
        Ok(PreparedStatement::new(sql))
    }

    async fn exec(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<ExecResult> {
        self.record(DbOperation::Exec, ctx, sql, args)?;
        Ok(ExecResult::default())
    }

    async fn query(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<Rows> {
        let state = self.record(DbOperation::Query, ctx, sql, args)?;
        Ok(Self::rows_for(&state, sql))
    }

    async fn query_row(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> SingleRow {
        match self.record(DbOperation::QueryRow, ctx, sql, args) {
            Ok(state) => SingleRow::new(Self::rows_for(&state, sql).into_iter().next()),
            Err(err) => SingleRow::from_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;
    use serde_json::json;

    fn id_row(id: i64) -> Row {
        Row::new(vec!["id".to_string()], vec![json!(id)]).unwrap()
    }

    #[tokio::test]
    async fn test_records_calls_and_scripts_rows() {
        let db = DryRunExecutor::new()
            .with_rows(vec![id_row(1), id_row(2)])
            .with_rows_for("SELECT id FROM one", vec![id_row(9)]);
        let ctx = QueryContext::new().with_namespace("tenant-a");

        assert_eq!(db.query(&ctx, "SELECT id FROM t", &[json!(1)]).await.unwrap().len(), 2);
        let row = db.query_row(&ctx, "SELECT id FROM one", &[]).await.into_result().unwrap();
        assert_eq!(row.get(0), Some(&json!(9)));

        let calls = db.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, DbOperation::Query);
        assert_eq!(calls[0].args, vec![json!(1)]);
        assert_eq!(calls[1].namespace.as_deref(), Some("tenant-a"));
    }

    #[tokio::test]
    async fn test_failure_is_deferred_for_query_row() {
        let db = DryRunExecutor::new().failing("connection refused");
        let ctx = QueryContext::new();

        assert!(db.query(&ctx, "SELECT 1", &[]).await.is_err());
        let row = db.query_row(&ctx, "SELECT 1", &[]).await;
        assert!(matches!(row.error(), Some(DatabaseError::QueryError(_))));
        assert_eq!(db.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_context() {
        let db = DryRunExecutor::new();
        let ctx = QueryContext::new();
        ctx.cancellation_token().cancel();

        assert!(db.prepare(&ctx, "SELECT 1").await.is_ok());
        let err = db.exec(&ctx, "DELETE FROM t", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "Query execution failed: context canceled");
    }
}
