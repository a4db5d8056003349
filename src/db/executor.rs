//! Statement execution capability.
//!
//! The query engine never talks to a driver directly. It hands a [`Statement`]
//! to an [`SqlExecutor`] and receives a [`RawResultSet`] back, which keeps the
//! SQL-building and normalization logic independent of the connection layer.

use crate::db::types::RawValue;
use crate::error::DbResult;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for SqlParam {
    fn from(v: u64) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// SQL text plus its positional parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl Statement {
    /// A statement with no bound parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind the next positional parameter.
    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Whether the text holds at most one statement.
    ///
    /// See [`is_single_statement`].
    pub fn is_single_statement(&self) -> bool {
        is_single_statement(&self.sql)
    }

    /// Number of `?` placeholders outside of quoted text.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut quote: Option<char> = None;
        for c in self.sql.chars() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '\'' || c == '"' || c == '`' => quote = Some(c),
                None if c == '?' => count += 1,
                None => {}
            }
        }
        count
    }
}

/// True unless a `;` is followed by anything other than whitespace or more
/// semicolons.
///
/// The text protocol runs every statement in a multi-statement string, so
/// this is checked before any unparameterized text is sent. It does not parse
/// SQL: a `;` inside a string literal or comment also counts.
pub fn is_single_statement(sql: &str) -> bool {
    match sql.find(';') {
        Some(pos) => sql[pos..].chars().all(|c| c == ';' || c.is_whitespace()),
        None => true,
    }
}

/// Column names and rows returned by a statement, in database order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawResultSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<RawValue>) -> Self {
        self.rows.push(row);
        self
    }
}

/// Database connection capability used by the query engine.
///
/// Implementations own their connections; concurrent calls must be safe.
pub trait SqlExecutor: Send + Sync {
    /// Execute a statement and return every row.
    fn fetch<'a>(&'a self, statement: &'a Statement) -> BoxFuture<'a, DbResult<RawResultSet>>;

    /// Execute a statement and return the first cell of the first row.
    fn fetch_scalar<'a>(
        &'a self,
        statement: &'a Statement,
    ) -> BoxFuture<'a, DbResult<Option<RawValue>>> {
        async move {
            let result = self.fetch(statement).await?;
            Ok(result
                .rows
                .into_iter()
                .next()
                .and_then(|row| row.into_iter().next()))
        }
        .boxed()
    }

    /// Check that the database is reachable.
    fn ping(&self) -> BoxFuture<'_, DbResult<()>>;

    /// Release all connections.
    fn close(&self) -> BoxFuture<'_, ()>;
}
