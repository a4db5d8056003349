//! MySQL connection pool.
//!
//! [`MySqlDatabase`] owns a `MySqlPool` and implements [`SqlExecutor`] on top
//! of it. Statements without bound parameters go through the text protocol so
//! that `SHOW`, `DESCRIBE` and `EXPLAIN` work regardless of prepared-statement
//! support.

use crate::config::Config;
use crate::db::executor::{RawResultSet, SqlExecutor, SqlParam, Statement};
use crate::db::types::{column_names, decode_row};
use crate::error::{DbError, DbResult};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Executor, MySqlPool};
use tracing::{debug, info, warn};

/// Unparameterized text holding more than one statement.
pub const MULTIPLE_STATEMENTS: &str = "multiple statements are not allowed";

/// A pooled MySQL connection handle.
#[derive(Debug, Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    /// Open a pool with the configured limits and verify it with a ping.
    pub async fn connect(config: &Config) -> DbResult<Self> {
        info!(
            url = %config.masked_url(),
            max_connections = config.max_connections,
            "Connecting to MySQL"
        );

        let options = config.connect_options().charset("utf8mb4");
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout_duration())
            .connect_with(options)
            .await
            .map_err(|e| DbError::from(e).context("failed to open database connection"))?;

        let db = Self { pool };
        SqlExecutor::ping(&db)
            .await
            .map_err(|e| e.context("failed to open database connection"))?;

        if let Some(version) = db.server_version().await {
            info!(version = %version, "Connected to MySQL");
        }
        Ok(db)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn server_version(&self) -> Option<String> {
        match sqlx::query_scalar::<_, String>("SELECT VERSION()")
            .fetch_one(&self.pool)
            .await
        {
            Ok(version) => Some(version),
            Err(e) => {
                warn!(error = %e, "Failed to get server version");
                None
            }
        }
    }

    async fn ping_pool(&self) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::Connection::ping(&mut *conn).await?;
        Ok(())
    }

    async fn fetch_rows(&self, statement: &Statement) -> DbResult<Vec<MySqlRow>> {
        if statement.params.is_empty() {
            if !statement.is_single_statement() {
                return Err(DbError::execution(MULTIPLE_STATEMENTS, None));
            }
            return Ok(self.pool.fetch_all(statement.sql.as_str()).await?);
        }

        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = match param {
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Text(s) => query.bind(s.as_str()),
            };
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Column names for a statement that produced no rows.
    async fn describe_columns(&self, sql: &str) -> Vec<String> {
        match self.pool.prepare(sql).await {
            Ok(prepared) => sqlx::Statement::columns(&prepared)
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            Err(e) => {
                debug!(error = %e, "Could not describe empty result set");
                Vec::new()
            }
        }
    }
}

impl SqlExecutor for MySqlDatabase {
    fn fetch<'a>(&'a self, statement: &'a Statement) -> BoxFuture<'a, DbResult<RawResultSet>> {
        async move {
            debug!(
                sql = %statement.sql,
                params = statement.params.len(),
                "Executing statement"
            );

            let rows = self.fetch_rows(statement).await?;
            let columns = match rows.first() {
                Some(row) => column_names(row),
                None => self.describe_columns(&statement.sql).await,
            };

            Ok(RawResultSet {
                columns,
                rows: rows.iter().map(decode_row).collect(),
            })
        }
        .boxed()
    }

    fn ping(&self) -> BoxFuture<'_, DbResult<()>> {
        self.ping_pool().boxed()
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        async move {
            info!("Closing database pool");
            self.pool.close().await;
        }
        .boxed()
    }
}
