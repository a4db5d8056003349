//! Shared test fixtures: a scripted in-memory executor.

#![allow(dead_code)]

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use mysql_mcp_server::db::{RawResultSet, RawValue, SqlExecutor, SqlParam, Statement};
use mysql_mcp_server::error::DbResult;
use mysql_mcp_server::tools::QueryEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&Statement) -> DbResult<RawResultSet> + Send + Sync;

/// Records every statement it receives and answers from a responder.
pub struct MockExecutor {
    responder: Box<Responder>,
    log: Mutex<Vec<Statement>>,
    closed: AtomicBool,
}

impl MockExecutor {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&Statement) -> DbResult<RawResultSet> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            log: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// An executor that answers every statement with an empty result.
    pub fn empty() -> Arc<Self> {
        Self::new(|_| Ok(RawResultSet::default()))
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.log.lock().unwrap().clone()
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl SqlExecutor for MockExecutor {
    fn fetch<'a>(&'a self, statement: &'a Statement) -> BoxFuture<'a, DbResult<RawResultSet>> {
        self.log.lock().unwrap().push(statement.clone());
        let result = (self.responder)(statement);
        async move { result }.boxed()
    }

    fn ping(&self) -> BoxFuture<'_, DbResult<()>> {
        async { Ok(()) }.boxed()
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        self.closed.store(true, Ordering::SeqCst);
        async {}.boxed()
    }
}

pub fn engine(mock: &Arc<MockExecutor>) -> QueryEngine {
    QueryEngine::new(mock.clone())
}

/// A single-cell result, as returned by `COUNT(*)`.
pub fn scalar(value: i64) -> RawResultSet {
    RawResultSet::new(["COUNT(*)"]).with_row(vec![RawValue::Int(value)])
}

pub fn text(value: &str) -> RawValue {
    RawValue::Text(value.to_string())
}

/// Integer parameter at `idx`, for slicing fixture rows by LIMIT/OFFSET.
pub fn int_param(statement: &Statement, idx: usize) -> i64 {
    match statement.params.get(idx) {
        Some(SqlParam::Int(v)) => *v,
        other => panic!("expected integer parameter at {}, got {:?}", idx, other),
    }
}

/// Answers the schema catalog queries from a fixed, sorted list of names.
pub fn schema_catalog(names: &[&str]) -> Arc<MockExecutor> {
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    MockExecutor::new(move |stmt| {
        if stmt.sql.contains("COUNT(*)") {
            return Ok(scalar(names.len() as i64));
        }
        let limit = int_param(stmt, 0) as usize;
        let offset = int_param(stmt, 1) as usize;
        let rows = names
            .iter()
            .skip(offset)
            .take(limit)
            .fold(RawResultSet::new(["SCHEMA_NAME"]), |rs, name| {
                rs.with_row(vec![text(name)])
            });
        Ok(rows)
    })
}
