//! Schema introspection tools.
//!
//! This module implements the `list_schemas`, `list_tables`,
//! `get_table_create` and `get_table_structure` tools on top of the
//! `information_schema` catalog.

use crate::db::{RawValue, SqlExecutor, Statement, statements};
use crate::error::{DbError, DbResult};
use crate::models::{
    ColumnRecord, CreateStatement, IndexRecord, ListSchemasRequest, ListTablesRequest,
    PageRequest, SchemaPage, TablePage, TableRecord, TableRef, TableStructure,
};
use std::sync::Arc;
use tracing::info;

pub struct SchemaToolHandler {
    executor: Arc<dyn SqlExecutor>,
}

impl SchemaToolHandler {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self { executor }
    }

    /// One page of schema names, ordered by name.
    pub async fn list_schemas(&self, request: ListSchemasRequest) -> DbResult<SchemaPage> {
        let page = request.page;
        let total_count = self
            .count(&statements::count_schemas())
            .await
            .map_err(|e| e.context("failed to get schema count"))?;

        let result = self
            .executor
            .fetch(&statements::list_schemas(page.page_size, page.offset()))
            .await
            .map_err(|e| e.context("failed to list schemas"))?;

        let schemas: Vec<String> = result
            .rows
            .iter()
            .filter_map(|row| text_at(row, 0))
            .collect();

        info!(
            page = page.page,
            returned = schemas.len(),
            total_count,
            "Listed schemas"
        );

        Ok(SchemaPage {
            schemas,
            page: page.page,
            page_size: page.page_size,
            total_count,
            total_pages: page.total_pages(total_count),
        })
    }

    /// One page of tables in a schema, ordered by name.
    pub async fn list_tables(&self, request: ListTablesRequest) -> DbResult<TablePage> {
        let ListTablesRequest { schema, page } = request;
        let total_count = self
            .count(&statements::count_tables(&schema))
            .await
            .map_err(|e| e.context("failed to get table count"))?;

        let result = self
            .executor
            .fetch(&statements::list_tables(&schema, page.page_size, page.offset()))
            .await
            .map_err(|e| e.context("failed to list tables"))?;

        let tables: Vec<TableRecord> = result.rows.iter().map(|row| table_record(row)).collect();

        info!(
            schema = %schema,
            page = page.page,
            returned = tables.len(),
            total_count,
            "Listed tables"
        );

        Ok(page_of_tables(schema, tables, page, total_count))
    }

    /// The `SHOW CREATE TABLE` text for a table or view.
    pub async fn get_table_create(&self, table: TableRef) -> DbResult<CreateStatement> {
        let result = self
            .executor
            .fetch(&statements::show_create_table(&table.schema, &table.table))
            .await
            .map_err(|e| e.context("failed to get create statement"))?;

        // Second column holds the statement for both tables and views.
        let create_statement = result
            .rows
            .first()
            .and_then(|row| text_at(row, 1))
            .ok_or_else(|| {
                DbError::execution("no rows returned", None)
                    .context("failed to get create statement")
            })?;

        info!(schema = %table.schema, table = %table.table, "Fetched create statement");

        Ok(CreateStatement {
            schema: table.schema,
            table: table.table,
            create_statement,
        })
    }

    /// Columns in ordinal order and indexes with their member columns.
    pub async fn get_table_structure(&self, table: TableRef) -> DbResult<TableStructure> {
        let column_rows = self
            .executor
            .fetch(&statements::describe_columns(&table.schema, &table.table))
            .await
            .map_err(|e| e.context("failed to get columns"))?;

        let columns: Vec<ColumnRecord> =
            column_rows.rows.iter().map(|r| column_record(r)).collect();

        let index_rows = self
            .executor
            .fetch(&statements::describe_indexes(&table.schema, &table.table))
            .await
            .map_err(|e| e.context("failed to get indexes"))?;

        let indexes: Vec<IndexRecord> = index_rows.rows.iter().map(|r| index_record(r)).collect();

        info!(
            schema = %table.schema,
            table = %table.table,
            columns = columns.len(),
            indexes = indexes.len(),
            "Described table"
        );

        Ok(TableStructure {
            schema: table.schema,
            table: table.table,
            columns,
            indexes,
        })
    }

    async fn count(&self, statement: &Statement) -> DbResult<i64> {
        let value = self
            .executor
            .fetch_scalar(statement)
            .await?
            .ok_or_else(|| DbError::execution("no rows returned", None))?;
        value.as_i64().ok_or_else(|| {
            DbError::execution(format!("unexpected count value: {:?}", value), None)
        })
    }
}

fn page_of_tables(
    schema: String,
    tables: Vec<TableRecord>,
    page: PageRequest,
    total_count: i64,
) -> TablePage {
    TablePage {
        schema,
        tables,
        page: page.page,
        page_size: page.page_size,
        total_count,
        total_pages: page.total_pages(total_count),
    }
}

fn cell(row: &[RawValue], idx: usize) -> Option<&RawValue> {
    row.get(idx).filter(|v| !v.is_null())
}

fn text_at(row: &[RawValue], idx: usize) -> Option<String> {
    cell(row, idx).and_then(RawValue::as_string)
}

fn int_at(row: &[RawValue], idx: usize) -> Option<i64> {
    cell(row, idx).and_then(RawValue::as_i64)
}

/// TABLE_NAME, TABLE_TYPE, ENGINE, TABLE_ROWS, DATA_LENGTH, INDEX_LENGTH,
/// CREATE_TIME, UPDATE_TIME
fn table_record(row: &[RawValue]) -> TableRecord {
    TableRecord {
        name: text_at(row, 0).unwrap_or_default(),
        table_type: text_at(row, 1).unwrap_or_default(),
        engine: text_at(row, 2),
        rows: int_at(row, 3),
        data_size: int_at(row, 4),
        index_size: int_at(row, 5),
        created_at: text_at(row, 6),
        updated_at: text_at(row, 7),
    }
}

/// COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY, COLUMN_DEFAULT, EXTRA,
/// COLUMN_COMMENT
fn column_record(row: &[RawValue]) -> ColumnRecord {
    ColumnRecord {
        name: text_at(row, 0).unwrap_or_default(),
        column_type: text_at(row, 1).unwrap_or_default(),
        nullable: text_at(row, 2).as_deref() == Some("YES"),
        key: text_at(row, 3).unwrap_or_default(),
        default: text_at(row, 4),
        extra: text_at(row, 5).unwrap_or_default(),
        comment: text_at(row, 6).filter(|c| !c.is_empty()),
    }
}

/// INDEX_NAME, NON_UNIQUE, comma-joined COLUMNS
fn index_record(row: &[RawValue]) -> IndexRecord {
    IndexRecord {
        name: text_at(row, 0).unwrap_or_default(),
        unique: int_at(row, 1) == Some(0),
        columns: text_at(row, 2)
            .map(|joined| joined.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
    }
}
