//! User and post queries.
//!
//! `queries` holds the static statements and their typed wrappers; `dynamic`
//! layers caller-customizable skeletons over the list statements.

pub mod dynamic;
pub mod models;
pub mod queries;

pub use dynamic::UserQueries;
pub use models::{User, UserPost};
pub use queries::Queries;
