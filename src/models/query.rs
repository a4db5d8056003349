//! Query-related data models.
//!
//! This module defines the free-form query and table search requests, and the
//! normalized result shape shared by both.

use crate::db::RawResultSet;
use crate::error::DbResult;
use crate::models::args::{QueryLimits, ToolArguments};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// A single result row keyed by column name, in column order.
pub type Record = Map<String, JsonValue>;

/// Request for `execute_query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteQueryRequest {
    pub query: String,
    pub limit: i64,
}

impl ExecuteQueryRequest {
    pub fn decode(args: &ToolArguments, limits: &QueryLimits) -> DbResult<Self> {
        Ok(Self {
            query: args.required_str("query")?,
            limit: limits.row_limit(args.optional_int("limit")?),
        })
    }
}

/// Request for `search_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTableRequest {
    pub schema: String,
    pub table: String,
    pub search_term: String,
    pub limit: i64,
}

impl SearchTableRequest {
    pub fn decode(args: &ToolArguments, limits: &QueryLimits) -> DbResult<Self> {
        Ok(Self {
            schema: args.required_str("schema")?,
            table: args.required_str("table")?,
            search_term: args.required_str("search_term")?,
            limit: limits.row_limit(args.optional_int("limit")?),
        })
    }
}

/// Columns and rows of a result set, normalized to JSON scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl QueryResult {
    /// Normalize a raw result set.
    ///
    /// Byte cells become strings, NULL becomes an explicit `null`, and a row
    /// shorter than the column list is padded with `null`.
    pub fn from_raw(raw: RawResultSet) -> Self {
        let RawResultSet { columns, rows } = raw;
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter();
                columns
                    .iter()
                    .map(|name| {
                        let value = cells.next().map(|c| c.into_json()).unwrap_or_default();
                        (name.clone(), value)
                    })
                    .collect::<Record>()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Output of `execute_query`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub count: usize,
}

impl From<QueryResult> for QueryOutput {
    fn from(result: QueryResult) -> Self {
        let count = result.row_count();
        Self {
            columns: result.columns,
            rows: result.rows,
            count,
        }
    }
}

/// Output of `search_table`. `columns` lists every column of the table, not
/// only the searched ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutput {
    pub schema: String,
    pub table: String,
    pub search_term: String,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub count: usize,
}
