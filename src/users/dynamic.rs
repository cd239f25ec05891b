//! Customizable entry points over the static user statements.
//!
//! ```
//! use percolate_dynsql::builder::{Order, Predicate};
//! use percolate_dynsql::config::QueryDefaults;
//! use percolate_dynsql::executor::{DryRunExecutor, QueryContext};
//! use percolate_dynsql::users::UserQueries;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let queries = UserQueries::new(&QueryDefaults::default()).unwrap();
//! let db = DryRunExecutor::new();
//!
//! queries
//!     .list_users(&QueryContext::new(), &db, Some(&|sb| {
//!         sb.filter(Predicate::gte("age", 21)).order_by("name", Order::Asc).limit(20)
//!     }))
//!     .await
//!     .unwrap();
//!
//! let call = db.last_call().unwrap();
//! assert_eq!(
//!     call.sql,
//!     "SELECT id, name, email, age, created_at, updated_at FROM users \
//!      WHERE deleted_at IS NULL AND age >= ? ORDER BY name ASC LIMIT 20"
//! );
//! # });
//! ```

use super::models::{User, UserPost};
use super::queries::{Queries, LIST_USERS, LIST_USER_POSTS};
use crate::builder::SelectBuilder;
use crate::config::QueryDefaults;
use crate::dynamic::{find_one, Customize, DynamicQuery};
use crate::executor::{Executor, QueryContext};
use crate::types::Result;

/// Base skeletons for the user list statements, built once at startup.
#[derive(Debug, Clone)]
pub struct UserQueries {
    list_users: DynamicQuery,
    list_user_posts: DynamicQuery,
}

impl UserQueries {
    /// Build the base skeletons.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ParseError` if a canonical statement fails to
    /// parse; callers should abort startup.
    pub fn new(defaults: &QueryDefaults) -> Result<Self> {
        Ok(Self {
            list_users: DynamicQuery::new(LIST_USERS, defaults)?,
            list_user_posts: DynamicQuery::new(LIST_USER_POSTS, defaults)?,
        })
    }

    /// Base skeleton behind `list_users`.
    pub fn users_base(&self) -> &SelectBuilder {
        self.list_users.base()
    }

    /// Base skeleton behind `list_user_posts`.
    pub fn user_posts_base(&self) -> &SelectBuilder {
        self.list_user_posts.base()
    }

    pub async fn list_users<E: Executor>(
        &self,
        ctx: &QueryContext,
        db: &E,
        customize: Option<Customize<'_>>,
    ) -> Result<Vec<User>> {
        Queries::new(self.list_users.intercept(db, customize))
            .list_users(ctx)
            .await
    }

    /// First user matching `customize`, capped at one row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoRows` when nothing matches.
    pub async fn find_user<E: Executor>(
        &self,
        ctx: &QueryContext,
        db: &E,
        customize: Option<Customize<'_>>,
    ) -> Result<User> {
        let first = |sb: SelectBuilder| apply(customize, sb).limit(1);
        find_one(self.list_users(ctx, db, Some(&first)).await?)
    }

    pub async fn list_user_posts<E: Executor>(
        &self,
        ctx: &QueryContext,
        db: &E,
        customize: Option<Customize<'_>>,
    ) -> Result<Vec<UserPost>> {
        Queries::new(self.list_user_posts.intercept(db, customize))
            .list_user_posts(ctx)
            .await
    }

    /// First post matching `customize`, capped at one row.
    pub async fn find_user_post<E: Executor>(
        &self,
        ctx: &QueryContext,
        db: &E,
        customize: Option<Customize<'_>>,
    ) -> Result<UserPost> {
        let first = |sb: SelectBuilder| apply(customize, sb).limit(1);
        find_one(self.list_user_posts(ctx, db, Some(&first)).await?)
    }
}

fn apply(customize: Option<Customize<'_>>, sb: SelectBuilder) -> SelectBuilder {
    match customize {
        Some(f) => f(sb),
        None => sb,
    }
}
