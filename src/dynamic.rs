//! Base skeletons and per-call overrides for generated queries.
//!
//! A [`DynamicQuery`] is built once per canonical statement at startup. Each
//! call clones its base skeleton, applies the caller's customization, and
//! wraps the caller's executor so only the matching generated statement is
//! redirected.

use crate::builder::{Predicate, SelectBuilder};
use crate::config::QueryDefaults;
use crate::executor::{select_for_query, Executor, GuardedOverride};
use crate::types::{DatabaseError, Result};
use tracing::info;

/// Caller-supplied refinement of a base skeleton.
pub type Customize<'a> = &'a (dyn Fn(SelectBuilder) -> SelectBuilder + Send + Sync);

/// Base skeleton for one canonical statement.
#[derive(Debug, Clone)]
pub struct DynamicQuery {
    canonical: String,
    base: SelectBuilder,
}

impl DynamicQuery {
    /// Parse `canonical` and apply `defaults` (soft-delete filter, row cap).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ParseError` if `canonical` is not a
    /// `SELECT <columns> FROM <table>` statement. Treat this as a startup
    /// failure: the canonical text is configuration, not input.
    pub fn new(canonical: &str, defaults: &QueryDefaults) -> Result<Self> {
        let mut base = SelectBuilder::from_canonical(canonical)?.placeholder(defaults.placeholder);
        if let Some(column) = &defaults.soft_delete_column {
            base = base.filter(Predicate::is_null(column.as_str()));
        }
        if let Some(limit) = defaults.default_limit {
            base = base.limit(limit);
        }

        info!(
            table = %base.table,
            columns = base.columns.len(),
            limit = ?base.limit,
            "built base skeleton"
        );

        Ok(Self {
            canonical: canonical.to_string(),
            base,
        })
    }

    /// Canonical statement text; also the interception guard.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Base skeleton shared by every call.
    pub fn base(&self) -> &SelectBuilder {
        &self.base
    }

    /// Copy of the base skeleton with `customize` applied.
    pub fn customize(&self, customize: Option<Customize<'_>>) -> SelectBuilder {
        let sb = self.base.clone();
        match customize {
            Some(f) => f(sb),
            None => sb,
        }
    }

    /// Wrap `raw` so the generated call for this statement runs the customized skeleton.
    pub fn intercept<E: Executor>(
        &self,
        raw: E,
        customize: Option<Customize<'_>>,
    ) -> GuardedOverride<E> {
        select_for_query(raw, self.canonical.as_str(), self.customize(customize))
    }
}

/// First item of a list result, or `DatabaseError::NoRows`.
pub fn find_one<T>(items: Vec<T>) -> Result<T> {
    items.into_iter().next().ok_or(DatabaseError::NoRows)
}
