//! Row types for the `users` and `user_posts` tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of `users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of `user_posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPost {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
