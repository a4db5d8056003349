//! Data models for the MySQL MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod args;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use args::{
    DEFAULT_PAGE_SIZE, DEFAULT_ROW_LIMIT, MAX_PAGE_SIZE, PageRequest, QueryLimits, ToolArguments,
};
pub use query::{
    ExecuteQueryRequest, QueryOutput, QueryResult, Record, SearchOutput, SearchTableRequest,
};
pub use schema::{
    ColumnRecord, CreateStatement, IndexRecord, ListSchemasRequest, ListTablesRequest,
    SchemaPage, TablePage, TableRecord, TableRef, TableStructure,
};
