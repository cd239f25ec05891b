//! Canonical statement parsing.

pub mod statement;

pub use statement::{parse, strip_comments, StatementMeta};
