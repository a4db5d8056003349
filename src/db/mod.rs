//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - The `SqlExecutor` capability the query engine runs statements through
//! - The MySQL connection pool implementing it
//! - Statement builders for catalog introspection and table search
//! - Type mappings from MySQL columns to driver-neutral values

pub mod executor;
pub mod pool;
pub mod statements;
pub mod types;

pub use executor::{RawResultSet, SqlExecutor, SqlParam, Statement, is_single_statement};
pub use pool::MySqlDatabase;
pub use types::RawValue;
