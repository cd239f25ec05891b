//! Percolate DynSQL - call-time query overrides for generated data-access code.
//!
//! Generated query functions send fixed statement text to an executor. This
//! crate parses that text into an editable [`builder::SelectBuilder`] and
//! wraps the executor so the generated call runs the caller's refined
//! statement instead, while the generated row decoding stays in place.

pub mod builder;
pub mod config;
pub mod dynamic;
pub mod executor;
pub mod otel;
pub mod parser;
pub mod types;
pub mod users;

// Re-export main types
pub use builder::{Order, PlaceholderFormat, Predicate, SelectBuilder};
pub use config::{Config, QueryDefaults};
pub use dynamic::{find_one, Customize, DynamicQuery};
pub use executor::{select, select_for_query, Executor, QueryContext};
pub use parser::{parse, StatementMeta};
pub use types::{Arg, DatabaseError, Result};
