//! Operation dispatch.
//!
//! [`QueryEngine`] is the single entry point shared by the MCP service and
//! the interactive terminal loop. Each front-end only translates its own
//! framing into an [`Operation`] plus [`ToolArguments`].

use crate::db::SqlExecutor;
use crate::error::{DbError, DbResult};
use crate::models::{
    ExecuteQueryRequest, ListSchemasRequest, ListTablesRequest, QueryLimits, SearchTableRequest,
    TableRef, ToolArguments,
};
use crate::tools::query::QueryToolHandler;
use crate::tools::schema::SchemaToolHandler;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// The callable tool kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListSchemas,
    ListTables,
    GetTableCreate,
    ExecuteQuery,
    SearchTable,
    GetTableStructure,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::ListSchemas,
        Operation::ListTables,
        Operation::GetTableCreate,
        Operation::ExecuteQuery,
        Operation::SearchTable,
        Operation::GetTableStructure,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListSchemas => "list_schemas",
            Self::ListTables => "list_tables",
            Self::GetTableCreate => "get_table_create",
            Self::ExecuteQuery => "execute_query",
            Self::SearchTable => "search_table",
            Self::GetTableStructure => "get_table_structure",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ListSchemas => {
                "List all schemas/databases available in the MySQL server with pagination"
            }
            Self::ListTables => "List all tables in a specific schema with pagination",
            Self::GetTableCreate => "Get the CREATE TABLE statement for a specific table",
            Self::ExecuteQuery => "Execute a SQL query (SELECT only for safety)",
            Self::SearchTable => "Search for a value across all columns in a table",
            Self::GetTableStructure => {
                "Get the structure (columns, types, constraints) of a table"
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| DbError::validation(format!("unknown tool: {}", s)))
    }
}

/// Dispatches operations to the schema and query handlers.
pub struct QueryEngine {
    executor: Arc<dyn SqlExecutor>,
    schema: SchemaToolHandler,
    query: QueryToolHandler,
    limits: QueryLimits,
}

impl QueryEngine {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self::with_limits(executor, QueryLimits::default())
    }

    pub fn with_limits(executor: Arc<dyn SqlExecutor>, limits: QueryLimits) -> Self {
        Self {
            schema: SchemaToolHandler::new(Arc::clone(&executor)),
            query: QueryToolHandler::new(Arc::clone(&executor)),
            executor,
            limits,
        }
    }

    /// Decode the arguments for `operation`, run it and serialize the output.
    ///
    /// Validation failures are returned before any statement is issued.
    pub async fn invoke(&self, operation: Operation, args: &ToolArguments) -> DbResult<JsonValue> {
        debug!(operation = %operation, "Invoking operation");
        let limits = &self.limits;

        match operation {
            Operation::ListSchemas => {
                let request = ListSchemasRequest::decode(args, limits)?;
                to_json(self.schema.list_schemas(request).await?)
            }
            Operation::ListTables => {
                let request = ListTablesRequest::decode(args, limits)?;
                to_json(self.schema.list_tables(request).await?)
            }
            Operation::GetTableCreate => {
                let table = TableRef::decode(args)?;
                to_json(self.schema.get_table_create(table).await?)
            }
            Operation::ExecuteQuery => {
                let request = ExecuteQueryRequest::decode(args, limits)?;
                to_json(self.query.execute_query(request).await?)
            }
            Operation::SearchTable => {
                let request = SearchTableRequest::decode(args, limits)?;
                to_json(self.query.search_table(request).await?)
            }
            Operation::GetTableStructure => {
                let table = TableRef::decode(args)?;
                to_json(self.schema.get_table_structure(table).await?)
            }
        }
    }

    /// [`invoke`](Self::invoke) by tool name.
    pub async fn invoke_named(&self, name: &str, args: &ToolArguments) -> DbResult<JsonValue> {
        let operation = name.parse::<Operation>()?;
        self.invoke(operation, args).await
    }

    /// Release the database connections.
    pub async fn close(&self) {
        self.executor.close().await
    }
}

fn to_json<T: Serialize>(output: T) -> DbResult<JsonValue> {
    serde_json::to_value(output)
        .map_err(|e| DbError::internal(format!("failed to serialize result: {}", e)))
}
