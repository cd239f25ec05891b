//! Static statements and their typed wrappers.
//!
//! Each wrapper sends its constant text to the executor unchanged, so an
//! interceptor can recognise it by exact comparison.

use super::models::{User, UserPost};
use crate::executor::{Executor, QueryContext};
use crate::types::{ExecResult, Result};
use serde_json::json;

pub const LIST_USERS: &str = "-- name: ListUsers :many
SELECT id, name, email, age, created_at, updated_at FROM users
";

pub const GET_USER: &str = "-- name: GetUser :one
SELECT id, name, email, age, created_at, updated_at FROM users
WHERE id = ? LIMIT 1
";

pub const LIST_USER_POSTS: &str = "-- name: ListUserPosts :many
SELECT id, user_id, title, body, created_at, updated_at FROM user_posts
";

pub const SOFT_DELETE_USER: &str = "-- name: SoftDeleteUser :exec
UPDATE users SET deleted_at = CURRENT_TIMESTAMP WHERE id = ?
";

/// Typed access to the user statements over any executor.
#[derive(Debug, Clone)]
pub struct Queries<E> {
    db: E,
}

impl<E: Executor> Queries<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }

    pub async fn list_users(&self, ctx: &QueryContext) -> Result<Vec<User>> {
        self.db.query(ctx, LIST_USERS, &[]).await?.decode_all()
    }

    pub async fn get_user(&self, ctx: &QueryContext, id: i64) -> Result<User> {
        self.db.query_row(ctx, GET_USER, &[json!(id)]).await.decode()
    }

    pub async fn list_user_posts(&self, ctx: &QueryContext) -> Result<Vec<UserPost>> {
        self.db.query(ctx, LIST_USER_POSTS, &[]).await?.decode_all()
    }

    pub async fn soft_delete_user(&self, ctx: &QueryContext, id: i64) -> Result<ExecResult> {
        self.db.exec(ctx, SOFT_DELETE_USER, &[json!(id)]).await
    }
}
