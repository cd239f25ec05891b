//! Dynamic statement builder.
//!
//! Provides a fluent select skeleton that renders to parameterized SQL:
//!
//! ```rust
//! use percolate_dynsql::builder::{Order, Predicate, SelectBuilder};
//! use serde_json::json;
//!
//! let query = SelectBuilder::from_statement("SELECT id, name FROM users")
//!     .filter(Predicate::Eq("status".into(), json!("active")))
//!     .filter(Predicate::Gt("age".into(), json!(18)))
//!     .order_by("created_at", Order::Desc)
//!     .limit(100);
//! ```

pub mod placeholder;
pub mod predicates;
pub mod select;

pub use placeholder::PlaceholderFormat;
pub use predicates::Predicate;
pub use select::{Order, SelectBuilder};
