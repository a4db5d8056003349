//! Statement builders for catalog introspection and table search.
//!
//! Every builder returns a [`Statement`] with its parameters already bound in
//! placeholder order. Schema, table and column names cannot be bound as
//! parameters, so the few statements that need them interpolate identifiers
//! through [`quote_identifier`] and nowhere else.

use crate::db::executor::Statement;

// =============================================================================
// SQL Query Templates
// =============================================================================

mod queries {
    pub const COUNT_SCHEMAS: &str = "SELECT COUNT(*) FROM information_schema.SCHEMATA";

    pub const LIST_SCHEMAS: &str = "SELECT SCHEMA_NAME FROM information_schema.SCHEMATA \
         ORDER BY SCHEMA_NAME LIMIT ? OFFSET ?";

    pub const COUNT_TABLES: &str =
        "SELECT COUNT(*) FROM information_schema.TABLES WHERE TABLE_SCHEMA = ?";

    pub const LIST_TABLES: &str = r#"
        SELECT TABLE_NAME, TABLE_TYPE, ENGINE, TABLE_ROWS,
               DATA_LENGTH, INDEX_LENGTH, CREATE_TIME, UPDATE_TIME
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = ?
        ORDER BY TABLE_NAME
        LIMIT ? OFFSET ?
    "#;

    pub const SEARCH_COLUMNS: &str = r#"
        SELECT COLUMN_NAME, DATA_TYPE
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    pub const DESCRIBE_COLUMNS: &str = r#"
        SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY,
               COLUMN_DEFAULT, EXTRA, COLUMN_COMMENT
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    pub const DESCRIBE_INDEXES: &str = r#"
        SELECT INDEX_NAME, NON_UNIQUE,
               GROUP_CONCAT(COLUMN_NAME ORDER BY SEQ_IN_INDEX) AS COLUMNS
        FROM information_schema.STATISTICS
        WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        GROUP BY INDEX_NAME, NON_UNIQUE
    "#;
}

/// Type-name fragments that mark a column as text-like.
pub const SEARCHABLE_TYPE_MARKERS: &[&str] = &[
    "char",
    "varchar",
    "text",
    "tinytext",
    "mediumtext",
    "longtext",
    "enum",
    "set",
];

/// Wrap an identifier in backticks.
///
/// The name is not escaped or validated: an embedded backtick ends the quoted
/// identifier. Any allow-list hardening of caller-supplied names belongs here.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name)
}

/// `` `schema`.`table` ``
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(table))
}

/// Whether a declared column type is eligible for pattern search.
pub fn is_searchable_type(data_type: &str) -> bool {
    let lower = data_type.to_lowercase();
    SEARCHABLE_TYPE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

pub fn count_schemas() -> Statement {
    Statement::raw(queries::COUNT_SCHEMAS)
}

pub fn list_schemas(page_size: i64, offset: i64) -> Statement {
    Statement::raw(queries::LIST_SCHEMAS)
        .bind(page_size)
        .bind(offset)
}

pub fn count_tables(schema: &str) -> Statement {
    Statement::raw(queries::COUNT_TABLES).bind(schema)
}

pub fn list_tables(schema: &str, page_size: i64, offset: i64) -> Statement {
    Statement::raw(queries::LIST_TABLES)
        .bind(schema)
        .bind(page_size)
        .bind(offset)
}

pub fn show_create_table(schema: &str, table: &str) -> Statement {
    Statement::raw(format!("SHOW CREATE TABLE {}", qualified_table(schema, table)))
}

/// Column names and `DATA_TYPE` values, in ordinal order.
pub fn search_columns(schema: &str, table: &str) -> Statement {
    Statement::raw(queries::SEARCH_COLUMNS)
        .bind(schema)
        .bind(table)
}

/// `SELECT *` over the table, matching `%term%` against every given column.
///
/// The pattern is bound once per column; the row limit is a literal.
pub fn search_table(
    schema: &str,
    table: &str,
    columns: &[String],
    search_term: &str,
    limit: i64,
) -> Statement {
    let where_clause = columns
        .iter()
        .map(|c| format!("{} LIKE ?", quote_identifier(c)))
        .collect::<Vec<_>>()
        .join(" OR ");

    let sql = format!(
        "SELECT * FROM {} WHERE {} LIMIT {}",
        qualified_table(schema, table),
        where_clause,
        limit
    );

    let pattern = format!("%{}%", search_term);
    columns
        .iter()
        .fold(Statement::raw(sql), |stmt, _| stmt.bind(pattern.as_str()))
}

pub fn describe_columns(schema: &str, table: &str) -> Statement {
    Statement::raw(queries::DESCRIBE_COLUMNS)
        .bind(schema)
        .bind(table)
}

/// One row per index, member columns comma-joined in sequence order.
pub fn describe_indexes(schema: &str, table: &str) -> Statement {
    Statement::raw(queries::DESCRIBE_INDEXES)
        .bind(schema)
        .bind(table)
}
