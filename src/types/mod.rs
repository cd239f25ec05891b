//! Core types: errors and executor result shapes.

pub mod error;
pub mod row;

pub use error::{DatabaseError, Result};
pub use row::{Arg, ExecResult, PreparedStatement, Row, Rows, SingleRow};
