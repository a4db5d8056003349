//! MCP service implementation using rmcp.
//!
//! This module defines the MySqlMcpService struct with the six database tools
//! exposed via the MCP protocol using the rmcp framework's macros. Each tool
//! forwards its parameters to [`QueryEngine::invoke`] and returns the JSON
//! document as a text content block.

use crate::mcp::params::{
    ExecuteQueryParams, ListSchemasParams, ListTablesParams, SearchTableParams, TableParams,
    to_arguments,
};
use crate::tools::{Operation, QueryEngine};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct MySqlMcpService {
    engine: Arc<QueryEngine>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl MySqlMcpService {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub fn engine(&self) -> &Arc<QueryEngine> {
        &self.engine
    }

    async fn call<P: Serialize>(
        &self,
        operation: Operation,
        params: &P,
    ) -> Result<CallToolResult, McpError> {
        let args = to_arguments(params)?;
        let output = self.engine.invoke(operation, &args).await.map_err(|e| {
            warn!(operation = %operation, error = %e, "Tool call failed");
            McpError::from(e)
        })?;
        let text = serde_json::to_string(&output).map_err(|e| {
            McpError::internal_error(format!("failed to marshal result: {}", e), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_router]
impl MySqlMcpService {
    #[tool(
        description = "List all schemas/databases available in the MySQL server with pagination"
    )]
    async fn list_schemas(
        &self,
        Parameters(params): Parameters<ListSchemasParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(Operation::ListSchemas, &params).await
    }

    #[tool(description = "List all tables in a specific schema with pagination")]
    async fn list_tables(
        &self,
        Parameters(params): Parameters<ListTablesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(Operation::ListTables, &params).await
    }

    #[tool(description = "Get the CREATE TABLE statement for a specific table")]
    async fn get_table_create(
        &self,
        Parameters(params): Parameters<TableParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(Operation::GetTableCreate, &params).await
    }

    #[tool(description = "Execute a SQL query (SELECT only for safety)")]
    async fn execute_query(
        &self,
        Parameters(params): Parameters<ExecuteQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(Operation::ExecuteQuery, &params).await
    }

    #[tool(description = "Search for a value across all columns in a table")]
    async fn search_table(
        &self,
        Parameters(params): Parameters<SearchTableParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(Operation::SearchTable, &params).await
    }

    #[tool(description = "Get the structure (columns, types, constraints) of a table")]
    async fn get_table_structure(
        &self,
        Parameters(params): Parameters<TableParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(Operation::GetTableStructure, &params).await
    }
}

#[tool_handler]
impl ServerHandler for MySqlMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mysql-mcp-server".to_owned(),
                title: Some("MySQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MySQL introspection and read-only query tools.\n\
                \n\
                ## Workflow\n\
                1. Call `list_schemas` to discover databases\n\
                2. Call `list_tables` with a `schema` to see its tables and views\n\
                3. Use `get_table_structure` or `get_table_create` to inspect a table\n\
                4. Use `search_table` or `execute_query` to read data\n\
                \n\
                ## Notes\n\
                - Listings are paginated: `page` is 1-based, `page_size` defaults to 20 (max 100)\n\
                - `execute_query` accepts SELECT, SHOW, DESCRIBE and EXPLAIN only; a SELECT \
                without LIMIT gets `LIMIT <limit>` appended (default 100)\n\
                - `search_table` matches `%term%` against the table's text columns"
                    .to_string(),
            ),
        }
    }
}
