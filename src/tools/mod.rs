//! MCP tool implementations.
//!
//! This module contains all database tool handlers:
//! - `engine`: Operation dispatch shared by every front-end
//! - `schema`: list_schemas, list_tables, get_table_create, get_table_structure
//! - `query`: execute_query and search_table
//! - `sql_validator`: Statement-kind guard for free-form queries

pub mod engine;
pub mod query;
pub mod schema;
pub mod sql_validator;

pub use engine::{Operation, QueryEngine};
pub use query::QueryToolHandler;
pub use schema::SchemaToolHandler;
