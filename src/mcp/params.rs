//! JSON-schema-described parameter structs for the MCP tools.
//!
//! These only describe the wire shape to clients. Every field is optional at
//! this layer so that a missing required argument reaches the engine and is
//! reported the same way from every front-end.

use crate::error::{DbError, DbResult};
use crate::models::ToolArguments;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input for the list_schemas tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListSchemasParams {
    /// Page number (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<f64>,
    /// Number of items per page (default: 20, max: 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<f64>,
}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListTablesParams {
    /// The schema/database name (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Page number (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<f64>,
    /// Number of items per page (default: 20, max: 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<f64>,
}

/// Input for the get_table_create and get_table_structure tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TableParams {
    /// The schema/database name (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// The table name (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

/// Input for the execute_query tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteQueryParams {
    /// The SQL query to execute (required; SELECT, SHOW, DESCRIBE or EXPLAIN only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Maximum number of rows to return (default: 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
}

/// Input for the search_table tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchTableParams {
    /// The schema/database name (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// The table name (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// The term to search for (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// Maximum number of rows to return (default: 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
}

/// Convert a parameter struct into the engine's argument map.
pub fn to_arguments<T: Serialize>(params: &T) -> DbResult<ToolArguments> {
    let value = serde_json::to_value(params)
        .map_err(|e| DbError::internal(format!("failed to encode arguments: {}", e)))?;
    ToolArguments::from_value(value)
}
