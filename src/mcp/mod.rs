//! MCP server integration module.
//!
//! This module provides the integration between the MCP protocol and
//! the query engine using the rmcp framework.

pub mod params;
pub mod service;

pub use service::MySqlMcpService;
