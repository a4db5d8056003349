//! Integration tests for the query engine.
//!
//! These tests drive every operation through `QueryEngine::invoke` against a
//! scripted executor and check both the statements issued and the JSON
//! documents produced.

mod common;

use common::{MockExecutor, engine, scalar, schema_catalog, text};
use mysql_mcp_server::db::{RawResultSet, RawValue, SqlParam};
use mysql_mcp_server::error::DbError;
use mysql_mcp_server::models::ToolArguments;
use mysql_mcp_server::tools::Operation;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn args(value: serde_json::Value) -> ToolArguments {
    ToolArguments::from_value(value).unwrap()
}

// =============================================================================
// list_schemas
// =============================================================================

#[tokio::test]
async fn test_list_schemas_second_page() {
    let mock = schema_catalog(&["a", "b", "c"]);
    let output = assert_ok!(
        engine(&mock)
            .invoke(Operation::ListSchemas, &args(json!({"page": 2, "page_size": 1})))
            .await
    );

    assert_eq!(
        output,
        json!({
            "schemas": ["b"],
            "page": 2,
            "page_size": 1,
            "total_count": 3,
            "total_pages": 3
        })
    );

    let statements = mock.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0].sql,
        "SELECT COUNT(*) FROM information_schema.SCHEMATA"
    );
    assert_eq!(statements[1].params, vec![SqlParam::Int(1), SqlParam::Int(1)]);
}

#[tokio::test]
async fn test_list_schemas_defaults() {
    let mock = schema_catalog(&["information_schema", "mysql", "shop"]);
    let output = assert_ok!(
        engine(&mock)
            .invoke(Operation::ListSchemas, &ToolArguments::new())
            .await
    );

    assert_eq!(output["page"], 1);
    assert_eq!(output["page_size"], 20);
    assert_eq!(output["total_pages"], 1);
    assert_eq!(output["schemas"], json!(["information_schema", "mysql", "shop"]));
}

#[tokio::test]
async fn test_list_schemas_clamps_page_size() {
    let mock = schema_catalog(&["a"]);
    let output = assert_ok!(
        engine(&mock)
            .invoke(Operation::ListSchemas, &args(json!({"page_size": 500})))
            .await
    );
    assert_eq!(output["page_size"], 100);
    assert_eq!(mock.statements()[1].params[0], SqlParam::Int(100));
}

#[tokio::test]
async fn test_list_schemas_empty_catalog() {
    let mock = schema_catalog(&[]);
    let output = assert_ok!(
        engine(&mock)
            .invoke(Operation::ListSchemas, &ToolArguments::new())
            .await
    );
    assert_eq!(output["schemas"], json!([]));
    assert_eq!(output["total_count"], 0);
    assert_eq!(output["total_pages"], 0);
}

#[tokio::test]
async fn test_list_schemas_count_failure_has_context() {
    let mock = MockExecutor::new(|_| {
        Err(DbError::execution(
            "Access denied",
            Some("42000".to_string()),
        ))
    });
    let err = assert_err!(
        engine(&mock)
            .invoke(Operation::ListSchemas, &ToolArguments::new())
            .await
    );
    assert_eq!(err.to_string(), "failed to get schema count: Access denied");
    assert_eq!(err.sql_state(), Some("42000"));
    assert_eq!(mock.statements().len(), 1);
}

#[tokio::test]
async fn test_list_schemas_count_without_rows_is_error() {
    let mock = MockExecutor::empty();
    let err = assert_err!(
        engine(&mock)
            .invoke(Operation::ListSchemas, &ToolArguments::new())
            .await
    );
    assert!(matches!(err, DbError::Execution { .. }));
    assert_eq!(err.to_string(), "failed to get schema count: no rows returned");
    assert_eq!(mock.statements().len(), 1);
}

// =============================================================================
// list_tables
// =============================================================================

#[tokio::test]
async fn test_list_tables_requires_schema() {
    let mock = MockExecutor::empty();
    for value in [json!({}), json!({"schema": ""}), json!({"schema": null})] {
        let err = assert_err!(
            engine(&mock)
                .invoke(Operation::ListTables, &args(value))
                .await
        );
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "schema parameter is required");
    }
    assert!(mock.statements().is_empty());
}

#[tokio::test]
async fn test_list_tables_sparse_records() {
    let mock = MockExecutor::new(|stmt| {
        if stmt.sql.contains("COUNT(*)") {
            return Ok(scalar(2));
        }
        Ok(RawResultSet::new([
            "TABLE_NAME",
            "TABLE_TYPE",
            "ENGINE",
            "TABLE_ROWS",
            "DATA_LENGTH",
            "INDEX_LENGTH",
            "CREATE_TIME",
            "UPDATE_TIME",
        ])
        .with_row(vec![
            text("orders"),
            text("BASE TABLE"),
            text("InnoDB"),
            RawValue::UInt(42),
            RawValue::UInt(16384),
            RawValue::UInt(0),
            text("2024-05-01 10:00:00"),
            RawValue::Null,
        ])
        .with_row(vec![
            text("v_orders"),
            text("VIEW"),
            RawValue::Null,
            RawValue::Null,
            RawValue::Null,
            RawValue::Null,
            RawValue::Null,
            RawValue::Null,
        ]))
    });

    let output = assert_ok!(
        engine(&mock)
            .invoke(
                Operation::ListTables,
                &args(json!({"schema": "shop", "page_size": 10}))
            )
            .await
    );

    assert_eq!(
        output,
        json!({
            "schema": "shop",
            "tables": [
                {
                    "name": "orders",
                    "type": "BASE TABLE",
                    "engine": "InnoDB",
                    "rows": 42,
                    "data_size": 16384,
                    "index_size": 0,
                    "created_at": "2024-05-01 10:00:00"
                },
                {"name": "v_orders", "type": "VIEW"}
            ],
            "page": 1,
            "page_size": 10,
            "total_count": 2,
            "total_pages": 1
        })
    );

    let statements = mock.statements();
    assert_eq!(statements[0].params, vec![SqlParam::Text("shop".into())]);
    assert_eq!(
        statements[1].params,
        vec![
            SqlParam::Text("shop".into()),
            SqlParam::Int(10),
            SqlParam::Int(0)
        ]
    );
}

// =============================================================================
// get_table_create
// =============================================================================

#[tokio::test]
async fn test_get_table_create() {
    let mock = MockExecutor::new(|_| {
        Ok(RawResultSet::new(["Table", "Create Table"]).with_row(vec![
            text("orders"),
            text("CREATE TABLE `orders` (\n  `id` int NOT NULL\n)"),
        ]))
    });

    let output = assert_ok!(
        engine(&mock)
            .invoke(
                Operation::GetTableCreate,
                &args(json!({"schema": "shop", "table": "orders"}))
            )
            .await
    );

    assert_eq!(output["schema"], "shop");
    assert_eq!(output["table"], "orders");
    assert_eq!(
        output["create_statement"],
        "CREATE TABLE `orders` (\n  `id` int NOT NULL\n)"
    );

    let statements = mock.statements();
    assert_eq!(statements[0].sql, "SHOW CREATE TABLE `shop`.`orders`");
    assert!(statements[0].params.is_empty());
}

#[tokio::test]
async fn test_get_table_create_missing_table_surfaces_driver_error() {
    let mock = MockExecutor::new(|_| {
        Err(DbError::execution(
            "Table 'shop.nope' doesn't exist",
            Some("42S02".to_string()),
        ))
    });
    let err = assert_err!(
        engine(&mock)
            .invoke(
                Operation::GetTableCreate,
                &args(json!({"schema": "shop", "table": "nope"}))
            )
            .await
    );
    assert!(!err.is_validation());
    assert_eq!(
        err.to_string(),
        "failed to get create statement: Table 'shop.nope' doesn't exist"
    );
}

#[tokio::test]
async fn test_get_table_create_requires_table() {
    let mock = MockExecutor::empty();
    let err = assert_err!(
        engine(&mock)
            .invoke(Operation::GetTableCreate, &args(json!({"schema": "shop"})))
            .await
    );
    assert_eq!(err.to_string(), "table parameter is required");
    assert!(mock.statements().is_empty());
}

// =============================================================================
// execute_query
// =============================================================================

#[tokio::test]
async fn test_execute_query_rejects_writes_before_execution() {
    let mock = MockExecutor::empty();
    for query in ["DELETE FROM users", "  insert into t values (1)", "CALL p()"] {
        let err = assert_err!(
            engine(&mock)
                .invoke(Operation::ExecuteQuery, &args(json!({"query": query})))
                .await
        );
        assert!(err.is_validation(), "{query}");
    }
    assert!(mock.statements().is_empty());
}

#[tokio::test]
async fn test_execute_query_rejects_piggybacked_write() {
    let mock = MockExecutor::empty();
    for query in [
        "SELECT 1; DELETE FROM shop.users",
        "select * from t;\nDELETE FROM t",
        "EXPLAIN SELECT 1; DROP TABLE t",
    ] {
        let err = assert_err!(
            engine(&mock)
                .invoke(Operation::ExecuteQuery, &args(json!({"query": query})))
                .await
        );
        assert!(err.is_validation(), "{query}");
        assert_eq!(err.to_string(), "only a single statement is allowed");
    }
    assert!(mock.statements().is_empty());
}

#[tokio::test]
async fn test_execute_query_trailing_semicolon() {
    let mock = MockExecutor::empty();
    assert_ok!(
        engine(&mock)
            .invoke(Operation::ExecuteQuery, &args(json!({"query": "SELECT 1;"})))
            .await
    );
    assert_eq!(mock.statements()[0].sql, "SELECT 1 LIMIT 100");
}

#[tokio::test]
async fn test_execute_query_appends_default_limit() {
    let mock = MockExecutor::empty();
    assert_ok!(
        engine(&mock)
            .invoke(
                Operation::ExecuteQuery,
                &args(json!({"query": "SELECT * FROM shop.orders"}))
            )
            .await
    );
    let statements = mock.statements();
    assert_eq!(statements[0].sql, "SELECT * FROM shop.orders LIMIT 100");
    assert!(statements[0].params.is_empty());
}

#[tokio::test]
async fn test_execute_query_keeps_existing_limit() {
    let mock = MockExecutor::empty();
    assert_ok!(
        engine(&mock)
            .invoke(
                Operation::ExecuteQuery,
                &args(json!({"query": "select id from t limit 3", "limit": 50}))
            )
            .await
    );
    assert_eq!(mock.statements()[0].sql, "select id from t limit 3");
}

#[tokio::test]
async fn test_execute_query_custom_limit_and_show() {
    let mock = MockExecutor::empty();
    let engine = engine(&mock);
    assert_ok!(
        engine
            .invoke(
                Operation::ExecuteQuery,
                &args(json!({"query": "SELECT 1", "limit": 7.9}))
            )
            .await
    );
    assert_ok!(
        engine
            .invoke(Operation::ExecuteQuery, &args(json!({"query": "SHOW TABLES"})))
            .await
    );
    let statements = mock.statements();
    assert_eq!(statements[0].sql, "SELECT 1 LIMIT 7");
    assert_eq!(statements[1].sql, "SHOW TABLES");
}

#[tokio::test]
async fn test_execute_query_normalizes_rows() {
    let mock = MockExecutor::new(|_| {
        Ok(RawResultSet::new(["id", "avatar", "deleted_at", "price"]).with_row(vec![
            RawValue::Int(1),
            RawValue::Bytes(b"png-bytes".to_vec()),
            RawValue::Null,
            text("19.99"),
        ]))
    });
    let output = assert_ok!(
        engine(&mock)
            .invoke(
                Operation::ExecuteQuery,
                &args(json!({"query": "SELECT id, avatar, deleted_at, price FROM items"}))
            )
            .await
    );
    assert_eq!(
        output,
        json!({
            "columns": ["id", "avatar", "deleted_at", "price"],
            "rows": [{"id": 1, "avatar": "png-bytes", "deleted_at": null, "price": "19.99"}],
            "count": 1
        })
    );
}

#[tokio::test]
async fn test_execute_query_empty_result_keeps_columns() {
    let mock = MockExecutor::new(|_| Ok(RawResultSet::new(["id", "name"])));
    let output = assert_ok!(
        engine(&mock)
            .invoke(
                Operation::ExecuteQuery,
                &args(json!({"query": "SELECT id, name FROM users WHERE 1 = 0"}))
            )
            .await
    );
    assert_eq!(output["columns"], json!(["id", "name"]));
    assert_eq!(output["rows"], json!([]));
    assert_eq!(output["count"], 0);
}

#[tokio::test]
async fn test_execute_query_database_error() {
    let mock = MockExecutor::new(|_| {
        Err(DbError::execution(
            "You have an error in your SQL syntax",
            Some("42000".to_string()),
        ))
    });
    let err = assert_err!(
        engine(&mock)
            .invoke(Operation::ExecuteQuery, &args(json!({"query": "SELECT FROM"})))
            .await
    );
    assert!(matches!(err, DbError::Execution { .. }));
    assert_eq!(
        err.to_string(),
        "failed to execute query: You have an error in your SQL syntax"
    );
}

// =============================================================================
// search_table
// =============================================================================

fn users_table() -> std::sync::Arc<MockExecutor> {
    MockExecutor::new(|stmt| {
        if stmt.sql.contains("information_schema.COLUMNS") {
            return Ok(RawResultSet::new(["COLUMN_NAME", "DATA_TYPE"])
                .with_row(vec![text("id"), text("int")])
                .with_row(vec![text("name"), text("varchar")])
                .with_row(vec![text("created_at"), text("datetime")])
                .with_row(vec![text("bio"), RawValue::Bytes(b"mediumtext".to_vec())])
                .with_row(vec![text("status"), text("enum")]));
        }
        Ok(RawResultSet::new(["id", "name", "created_at", "bio", "status"]).with_row(vec![
            RawValue::Int(7),
            text("bob"),
            text("2024-01-01 00:00:00"),
            RawValue::Null,
            text("active"),
        ]))
    })
}

#[tokio::test]
async fn test_search_table_binds_pattern_per_searchable_column() {
    let mock = users_table();
    let output = assert_ok!(
        engine(&mock)
            .invoke(
                Operation::SearchTable,
                &args(json!({"schema": "shop", "table": "users", "search_term": "bo"}))
            )
            .await
    );

    let statements = mock.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0].params,
        vec![
            SqlParam::Text("shop".into()),
            SqlParam::Text("users".into())
        ]
    );

    let search = &statements[1];
    assert_eq!(
        search.sql,
        "SELECT * FROM `shop`.`users` WHERE `name` LIKE ? OR `bio` LIKE ? OR `status` LIKE ? LIMIT 100"
    );
    assert_eq!(search.params.len(), 3);
    assert_eq!(search.sql.matches("LIKE ?").count(), search.params.len());
    assert_eq!(search.placeholder_count(), search.params.len());
    assert!(
        search
            .params
            .iter()
            .all(|p| *p == SqlParam::Text("%bo%".into()))
    );

    assert_eq!(output["search_term"], "bo");
    assert_eq!(
        output["columns"],
        json!(["id", "name", "created_at", "bio", "status"])
    );
    assert_eq!(output["count"], 1);
    assert_eq!(output["rows"][0]["bio"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_search_table_custom_limit() {
    let mock = users_table();
    assert_ok!(
        engine(&mock)
            .invoke(
                Operation::SearchTable,
                &args(json!({"schema": "shop", "table": "users", "search_term": "x", "limit": 5}))
            )
            .await
    );
    assert!(mock.statements()[1].sql.ends_with("LIMIT 5"));
}

#[tokio::test]
async fn test_search_table_without_text_columns_is_validation_error() {
    let mock = MockExecutor::new(|_| {
        Ok(RawResultSet::new(["COLUMN_NAME", "DATA_TYPE"])
            .with_row(vec![text("id"), text("bigint")])
            .with_row(vec![text("amount"), text("decimal")]))
    });
    let err = assert_err!(
        engine(&mock)
            .invoke(
                Operation::SearchTable,
                &args(json!({"schema": "shop", "table": "ledger", "search_term": "1"}))
            )
            .await
    );
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "no searchable columns found in table");
    // Only the catalog lookup ran.
    assert_eq!(mock.statements().len(), 1);
}

#[tokio::test]
async fn test_search_table_requires_search_term() {
    let mock = MockExecutor::empty();
    let err = assert_err!(
        engine(&mock)
            .invoke(
                Operation::SearchTable,
                &args(json!({"schema": "shop", "table": "users"}))
            )
            .await
    );
    assert_eq!(err.to_string(), "search_term parameter is required");
    assert!(mock.statements().is_empty());
}

// =============================================================================
// get_table_structure
// =============================================================================

#[tokio::test]
async fn test_get_table_structure() {
    let mock = MockExecutor::new(|stmt| {
        if stmt.sql.contains("information_schema.COLUMNS") {
            return Ok(RawResultSet::new([
                "COLUMN_NAME",
                "COLUMN_TYPE",
                "IS_NULLABLE",
                "COLUMN_KEY",
                "COLUMN_DEFAULT",
                "EXTRA",
                "COLUMN_COMMENT",
            ])
            .with_row(vec![
                text("id"),
                text("int unsigned"),
                text("NO"),
                text("PRI"),
                RawValue::Null,
                text("auto_increment"),
                text(""),
            ])
            .with_row(vec![
                text("status"),
                text("varchar(16)"),
                text("YES"),
                text("MUL"),
                text("new"),
                text(""),
                text("order state"),
            ]));
        }
        Ok(RawResultSet::new(["INDEX_NAME", "NON_UNIQUE", "COLUMNS"])
            .with_row(vec![text("PRIMARY"), RawValue::Int(0), text("id")])
            .with_row(vec![text("idx_a"), RawValue::Int(1), text("b,a")]))
    });

    let output = assert_ok!(
        engine(&mock)
            .invoke(
                Operation::GetTableStructure,
                &args(json!({"schema": "shop", "table": "orders"}))
            )
            .await
    );

    assert_eq!(
        output,
        json!({
            "schema": "shop",
            "table": "orders",
            "columns": [
                {
                    "name": "id",
                    "type": "int unsigned",
                    "nullable": false,
                    "key": "PRI",
                    "extra": "auto_increment"
                },
                {
                    "name": "status",
                    "type": "varchar(16)",
                    "nullable": true,
                    "key": "MUL",
                    "extra": "",
                    "default": "new",
                    "comment": "order state"
                }
            ],
            "indexes": [
                {"name": "PRIMARY", "unique": true, "columns": ["id"]},
                {"name": "idx_a", "unique": false, "columns": ["b", "a"]}
            ]
        })
    );
    assert!(mock.statements()[1].sql.contains("GROUP_CONCAT"));
}

#[tokio::test]
async fn test_get_table_structure_index_without_columns() {
    let mock = MockExecutor::new(|stmt| {
        if stmt.sql.contains("STATISTICS") {
            return Ok(RawResultSet::new(["INDEX_NAME", "NON_UNIQUE", "COLUMNS"])
                .with_row(vec![text("idx_expr"), RawValue::Int(1), RawValue::Null]));
        }
        Ok(RawResultSet::default())
    });
    let output = assert_ok!(
        engine(&mock)
            .invoke(
                Operation::GetTableStructure,
                &args(json!({"schema": "shop", "table": "orders"}))
            )
            .await
    );
    assert_eq!(
        output["indexes"],
        json!([{"name": "idx_expr", "unique": false, "columns": []}])
    );
}

#[tokio::test]
async fn test_get_table_structure_index_failure_has_context() {
    let mock = MockExecutor::new(|stmt| {
        if stmt.sql.contains("STATISTICS") {
            return Err(DbError::execution("Lost connection", None));
        }
        Ok(RawResultSet::default())
    });
    let err = assert_err!(
        engine(&mock)
            .invoke(
                Operation::GetTableStructure,
                &args(json!({"schema": "shop", "table": "orders"}))
            )
            .await
    );
    assert_eq!(err.to_string(), "failed to get indexes: Lost connection");
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn test_invoke_named() {
    let mock = schema_catalog(&["a"]);
    let engine = engine(&mock);
    let output = assert_ok!(
        engine
            .invoke_named("list_schemas", &ToolArguments::new())
            .await
    );
    assert_eq!(output["schemas"], json!(["a"]));

    let err = assert_err!(engine.invoke_named("drop_schema", &ToolArguments::new()).await);
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_close_releases_executor() {
    let mock = MockExecutor::empty();
    engine(&mock).close().await;
    assert!(mock.was_closed());
}
