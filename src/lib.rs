//! MySQL MCP Server Library
//!
//! This library exposes MySQL schema introspection and read-only queries as
//! MCP (Model Context Protocol) tools. One [`QueryEngine`](tools::QueryEngine)
//! backs three front-ends: stdio, streamable HTTP and an interactive terminal.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{DbError, DbResult};
pub use mcp::MySqlMcpService;
pub use tools::{Operation, QueryEngine};
