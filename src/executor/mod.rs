//! Execution handle contract and its interceptors.
//!
//! `Executor` is the four-primitive shape generated data-access code calls
//! into: `prepare`, `exec`, `query` and `query_row`. Interceptors implement the
//! same trait around a wrapped handle, so generated code runs unchanged
//! against either.

pub mod dry_run;
pub mod intercept;

pub use dry_run::{DryRunExecutor, RecordedCall};
pub use intercept::{select, select_for_query, GuardedOverride, Override, Passthrough};

use crate::types::{Arg, ExecResult, PreparedStatement, Result, Rows, SingleRow};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-call context forwarded to the wrapped executor.
///
/// Interceptors never inspect the cancellation token; it is handed to the
/// driver as-is.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancel: CancellationToken,
    namespace: Option<String>,
}

impl QueryContext {
    /// Context with a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tenant or database name (recorded as `db.namespace`).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Use a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Cancellation token for the driver.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Tenant or database name.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

/// Executable database handle.
///
/// `query_row` has no error channel: failures travel inside `SingleRow` and
/// surface when the row is consumed.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Compile a statement for later execution.
    async fn prepare(&self, ctx: &QueryContext, sql: &str) -> Result<PreparedStatement>;

    /// Run a statement that returns no rows.
    async fn exec(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<ExecResult>;

    /// Run a statement returning any number of rows.
    async fn query(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<Rows>;

    /// Run a statement returning at most one row.
    async fn query_row(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> SingleRow;
}

macro_rules! forward_executor {
    ($($ty:ty),*) => {$(
        #[async_trait]
        impl<E: Executor + ?Sized> Executor for $ty {
            async fn prepare(&self, ctx: &QueryContext, sql: &str) -> Result<PreparedStatement> {
                (**self).prepare(ctx, sql).await
            }

            async fn exec(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<ExecResult> {
                (**self).exec(ctx, sql, args).await
            }

            async fn query(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<Rows> {
                (**self).query(ctx, sql, args).await
            }

            async fn query_row(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> SingleRow {
                (**self).query_row(ctx, sql, args).await
            }
        }
    )*};
}

forward_executor!(&E, Box<E>, Arc<E>);
