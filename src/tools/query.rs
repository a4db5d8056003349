//! Query tools.
//!
//! This module implements the `execute_query` tool for guarded free-form
//! statements and the `search_table` tool for pattern search across a
//! table's text columns.

use crate::db::{SqlExecutor, Statement, statements};
use crate::error::{DbError, DbResult};
use crate::models::{
    ExecuteQueryRequest, QueryOutput, QueryResult, SearchOutput, SearchTableRequest,
};
use crate::tools::sql_validator;
use std::sync::Arc;
use tracing::info;

pub const NO_SEARCHABLE_COLUMNS: &str = "no searchable columns found in table";

/// Handler for query execution.
pub struct QueryToolHandler {
    executor: Arc<dyn SqlExecutor>,
}

impl QueryToolHandler {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self { executor }
    }

    /// Handle the execute_query tool call.
    ///
    /// The statement kind is checked before anything is sent to the database.
    /// A `SELECT` without `LIMIT` gets the request's row limit appended; the
    /// text is then sent as-is with no bound parameters.
    pub async fn execute_query(&self, request: ExecuteQueryRequest) -> DbResult<QueryOutput> {
        let kind = sql_validator::validate_readonly(&request.query)?;
        let sql = sql_validator::apply_row_limit(&request.query, kind, request.limit);

        let raw = self
            .executor
            .fetch(&Statement::raw(sql))
            .await
            .map_err(|e| e.context("failed to execute query"))?;

        let output = QueryOutput::from(QueryResult::from_raw(raw));

        info!(
            kind = ?kind,
            columns = output.columns.len(),
            row_count = output.count,
            "Query executed"
        );

        Ok(output)
    }

    /// Handle the search_table tool call.
    pub async fn search_table(&self, request: SearchTableRequest) -> DbResult<SearchOutput> {
        let SearchTableRequest {
            schema,
            table,
            search_term,
            limit,
        } = request;

        let catalog = self
            .executor
            .fetch(&statements::search_columns(&schema, &table))
            .await
            .map_err(|e| e.context("failed to get columns"))?;

        let mut columns = Vec::with_capacity(catalog.rows.len());
        let mut searchable = Vec::new();
        for row in &catalog.rows {
            let name = row.first().and_then(|v| v.as_string()).unwrap_or_default();
            let data_type = row.get(1).and_then(|v| v.as_string()).unwrap_or_default();
            if statements::is_searchable_type(&data_type) {
                searchable.push(name.clone());
            }
            columns.push(name);
        }

        if searchable.is_empty() {
            return Err(DbError::validation(NO_SEARCHABLE_COLUMNS));
        }

        let statement =
            statements::search_table(&schema, &table, &searchable, &search_term, limit);
        let raw = self
            .executor
            .fetch(&statement)
            .await
            .map_err(|e| e.context("failed to search table"))?;

        let rows = QueryResult::from_raw(raw).rows;
        let count = rows.len();

        info!(
            schema = %schema,
            table = %table,
            searched_columns = searchable.len(),
            row_count = count,
            "Table searched"
        );

        Ok(SearchOutput {
            schema,
            table,
            search_term,
            columns,
            rows,
            count,
        })
    }
}
