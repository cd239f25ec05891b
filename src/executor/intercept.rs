//! Executor wrappers that substitute a rendered select skeleton for the
//! statement a caller supplies.
//!
//! Three variants, chosen at construction:
//!
//! | Variant             | `query` / `query_row`             | `exec`     | `prepare` |
//! |---------------------|-----------------------------------|------------|-----------|
//! | [`Passthrough`]     | forwarded                         | forwarded  | forwarded |
//! | [`GuardedOverride`] | overridden when the guard matches | forwarded  | forwarded |
//! | [`Override`]        | always overridden                 | overridden | forwarded |
//!
//! `prepare` is never rewritten: a prepared statement is compiled before any
//! arguments exist, so swapping its text would silently drop the skeleton's
//! bound arguments.
//!
//! Render failures surface as errors from `query` and `exec`. `query_row` has
//! no error channel, so there a render failure degrades to forwarding the
//! caller's original statement and arguments (logged at `warn`).

use super::{Executor, QueryContext};
use crate::builder::SelectBuilder;
use crate::otel::{db_query_span, record_intercept, record_returned_rows, DbOperation, InterceptAction};
use crate::types::{Arg, ExecResult, PreparedStatement, Result, Rows, SingleRow};
use async_trait::async_trait;
use tracing::{debug, trace, warn, Instrument};

/// Wrap `raw` so every `query`, `query_row` and `exec` runs `sb` instead.
///
/// # Example
///
/// ```rust
/// use percolate_dynsql::builder::SelectBuilder;
/// use percolate_dynsql::executor::{self, DryRunExecutor, Executor, QueryContext};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let raw = DryRunExecutor::new();
/// let sb = SelectBuilder::from_statement("SELECT id FROM users").limit(5);
/// let db = executor::select(raw.clone(), sb);
///
/// db.query(&QueryContext::new(), "SELECT anything", &[]).await.unwrap();
/// assert_eq!(raw.last_call().unwrap().sql, "SELECT id FROM users LIMIT 5");
/// # });
/// ```
pub fn select<E: Executor>(raw: E, sb: SelectBuilder) -> Override<E> {
    Override::new(raw, sb)
}

/// Wrap `raw` so only queries whose text equals `expected` run `sb` instead.
///
/// An empty `expected` overrides every `query` and `query_row`. `exec` and
/// `prepare` always pass through.
pub fn select_for_query<E: Executor>(
    raw: E,
    expected: impl Into<String>,
    sb: SelectBuilder,
) -> GuardedOverride<E> {
    GuardedOverride::new(raw, expected, sb)
}

/// Forwards every call unchanged.
#[derive(Debug, Clone)]
pub struct Passthrough<E> {
    raw: E,
}

impl<E: Executor> Passthrough<E> {
    /// Wrap `raw`.
    pub fn new(raw: E) -> Self {
        Self { raw }
    }

    /// Unwrap the handle.
    pub fn into_inner(self) -> E {
        self.raw
    }
}

/// Overrides read queries whose statement text equals a guard.
#[derive(Debug, Clone)]
pub struct GuardedOverride<E> {
    raw: E,
    expected: String,
    sb: SelectBuilder,
}

impl<E: Executor> GuardedOverride<E> {
    /// Wrap `raw`; an empty `expected` matches every statement.
    pub fn new(raw: E, expected: impl Into<String>, sb: SelectBuilder) -> Self {
        Self {
            raw,
            expected: expected.into(),
            sb,
        }
    }

    /// Guard text (empty means unconditional).
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Skeleton substituted on a match.
    pub fn skeleton(&self) -> &SelectBuilder {
        &self.sb
    }

    /// `true` if a call with statement `sql` is overridden.
    pub fn matches(&self, sql: &str) -> bool {
        self.expected.is_empty() || self.expected == sql
    }

    fn skeleton_for(&self, sql: &str) -> Option<&SelectBuilder> {
        self.matches(sql).then_some(&self.sb)
    }
}

/// Overrides every `query`, `query_row` and `exec`.
#[derive(Debug, Clone)]
pub struct Override<E> {
    raw: E,
    sb: SelectBuilder,
}

impl<E: Executor> Override<E> {
    /// Wrap `raw`.
    pub fn new(raw: E, sb: SelectBuilder) -> Self {
        Self { raw, sb }
    }

    /// Skeleton substituted on every call.
    pub fn skeleton(&self) -> &SelectBuilder {
        &self.sb
    }
}

#[async_trait]
impl<E: Executor> Executor for Passthrough<E> {
    async fn prepare(&self, ctx: &QueryContext, sql: &str) -> Result<PreparedStatement> {
        prepare_original(&self.raw, ctx, sql).await
    }

    async fn exec(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<ExecResult> {
        exec_with(&self.raw, None, ctx, sql, args).await
    }

    async fn query(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<Rows> {
        query_with(&self.raw, None, ctx, sql, args).await
    }

    async fn query_row(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> SingleRow {
        query_row_with(&self.raw, None, ctx, sql, args).await
    }
}

#[async_trait]
impl<E: Executor> Executor for GuardedOverride<E> {
    async fn prepare(&self, ctx: &QueryContext, sql: &str) -> Result<PreparedStatement> {
        prepare_original(&self.raw, ctx, sql).await
    }

    // Guarded interception is scoped to reads.
    async fn exec(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<ExecResult> {
        exec_with(&self.raw, None, ctx, sql, args).await
    }

    async fn query(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<Rows> {
        query_with(&self.raw, self.skeleton_for(sql), ctx, sql, args).await
    }

    async fn query_row(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> SingleRow {
        query_row_with(&self.raw, self.skeleton_for(sql), ctx, sql, args).await
    }
}

#[async_trait]
impl<E: Executor> Executor for Override<E> {
    async fn prepare(&self, ctx: &QueryContext, sql: &str) -> Result<PreparedStatement> {
        prepare_original(&self.raw, ctx, sql).await
    }

    async fn exec(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<ExecResult> {
        exec_with(&self.raw, Some(&self.sb), ctx, sql, args).await
    }

    async fn query(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> Result<Rows> {
        query_with(&self.raw, Some(&self.sb), ctx, sql, args).await
    }

    async fn query_row(&self, ctx: &QueryContext, sql: &str, args: &[Arg]) -> SingleRow {
        query_row_with(&self.raw, Some(&self.sb), ctx, sql, args).await
    }
}

async fn prepare_original<E: Executor>(
    raw: &E,
    ctx: &QueryContext,
    sql: &str,
) -> Result<PreparedStatement> {
    let span = db_query_span(DbOperation::Prepare, sql, ctx.namespace());
    record_intercept(&span, InterceptAction::Passthrough, None);
    raw.prepare(ctx, sql).instrument(span).await
}

async fn exec_with<E: Executor>(
    raw: &E,
    sb: Option<&SelectBuilder>,
    ctx: &QueryContext,
    sql: &str,
    args: &[Arg],
) -> Result<ExecResult> {
    let span = db_query_span(DbOperation::Exec, sql, ctx.namespace());
    let Some(sb) = sb else {
        record_intercept(&span, InterceptAction::Passthrough, None);
        return raw.exec(ctx, sql, args).instrument(span).await;
    };

    let (query, query_args) = sb.to_sql()?;
    record_intercept(&span, InterceptAction::Override, Some(&sb.table));
    debug!(parent: &span, original = sql, rewritten = %query, args = query_args.len(), "overriding exec");
    raw.exec(ctx, &query, &query_args).instrument(span).await
}

async fn query_with<E: Executor>(
    raw: &E,
    sb: Option<&SelectBuilder>,
    ctx: &QueryContext,
    sql: &str,
    args: &[Arg],
) -> Result<Rows> {
    let span = db_query_span(DbOperation::Query, sql, ctx.namespace());
    let rows = match sb {
        None => {
            record_intercept(&span, InterceptAction::Passthrough, None);
            trace!(parent: &span, "forwarding query unchanged");
            raw.query(ctx, sql, args).instrument(span.clone()).await?
        }
        Some(sb) => {
            let (query, query_args) = sb.to_sql()?;
            record_intercept(&span, InterceptAction::Override, Some(&sb.table));
            debug!(parent: &span, original = sql, rewritten = %query, args = query_args.len(), "overriding query");
            raw.query(ctx, &query, &query_args).instrument(span.clone()).await?
        }
    };
    record_returned_rows(&span, rows.len());
    Ok(rows)
}

async fn query_row_with<E: Executor>(
    raw: &E,
    sb: Option<&SelectBuilder>,
    ctx: &QueryContext,
    sql: &str,
    args: &[Arg],
) -> SingleRow {
    let span = db_query_span(DbOperation::QueryRow, sql, ctx.namespace());
    let Some(sb) = sb else {
        record_intercept(&span, InterceptAction::Passthrough, None);
        return raw.query_row(ctx, sql, args).instrument(span).await;
    };

    match sb.to_sql() {
        Ok((query, query_args)) => {
            record_intercept(&span, InterceptAction::Override, Some(&sb.table));
            debug!(parent: &span, original = sql, rewritten = %query, args = query_args.len(), "overriding query_row");
            raw.query_row(ctx, &query, &query_args).instrument(span).await
        }
        Err(err) => {
            // No error channel here: forward the caller's statement instead.
            record_intercept(&span, InterceptAction::Fallback, None);
            warn!(parent: &span, error = %err, "skeleton failed to render, forwarding original query_row");
            raw.query_row(ctx, sql, args).instrument(span).await
        }
    }
}
