//! Schema-related data models.
//!
//! This module defines the typed requests and the output documents of the
//! catalog introspection operations.

use crate::error::DbResult;
use crate::models::args::{PageRequest, QueryLimits, ToolArguments};
use serde::Serialize;

/// Request for `list_schemas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSchemasRequest {
    pub page: PageRequest,
}

impl ListSchemasRequest {
    pub fn decode(args: &ToolArguments, limits: &QueryLimits) -> DbResult<Self> {
        Ok(Self {
            page: decode_page(args, limits)?,
        })
    }
}

/// Request for `list_tables`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTablesRequest {
    pub schema: String,
    pub page: PageRequest,
}

impl ListTablesRequest {
    pub fn decode(args: &ToolArguments, limits: &QueryLimits) -> DbResult<Self> {
        Ok(Self {
            schema: args.required_str("schema")?,
            page: decode_page(args, limits)?,
        })
    }
}

/// A schema-qualified table, used by `get_table_create` and `get_table_structure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn decode(args: &ToolArguments) -> DbResult<Self> {
        Ok(Self {
            schema: args.required_str("schema")?,
            table: args.required_str("table")?,
        })
    }
}

fn decode_page(args: &ToolArguments, limits: &QueryLimits) -> DbResult<PageRequest> {
    let page = args.optional_int("page")?;
    let page_size = args.optional_int("page_size")?;
    Ok(PageRequest::resolve(page, page_size, limits))
}

/// One page of schema names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaPage {
    pub schemas: Vec<String>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// One page of tables in a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub schema: String,
    pub tables: Vec<TableRecord>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Catalog entry for a table or view. NULL catalog values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub table_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Row estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
    /// Bytes (excluding indexes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<i64>,
    /// Bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateStatement {
    pub schema: String,
    pub table: String,
    pub create_statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStructure {
    pub schema: String,
    pub table: String,
    pub columns: Vec<ColumnRecord>,
    pub indexes: Vec<IndexRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnRecord {
    pub name: String,
    /// Declared type, e.g. `varchar(255)` or `int unsigned`
    #[serde(rename = "type")]
    pub column_type: String,
    pub nullable: bool,
    /// `PRI`, `UNI`, `MUL` or empty
    pub key: String,
    pub extra: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRecord {
    pub name: String,
    pub unique: bool,
    /// Member columns in index sequence order
    pub columns: Vec<String>,
}
