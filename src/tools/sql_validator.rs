//! Statement-kind guard for free-form queries.
//!
//! `execute_query` only accepts statements whose trimmed, case-folded text
//! starts with `SELECT`, `SHOW`, `DESCRIBE` or `EXPLAIN`, and that hold a
//! single statement. Neither check parses SQL. The server-side account's
//! privileges remain the real boundary.

use crate::db::is_single_statement;
use crate::error::{DbError, DbResult};

/// Kind of statement accepted by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatementKind {
    Select,
    Show,
    Describe,
    Explain,
}

impl ReadStatementKind {
    const PREFIXES: [(&'static str, ReadStatementKind); 4] = [
        ("SELECT", ReadStatementKind::Select),
        ("SHOW", ReadStatementKind::Show),
        ("DESCRIBE", ReadStatementKind::Describe),
        ("EXPLAIN", ReadStatementKind::Explain),
    ];
}

pub const REJECTED_STATEMENT: &str =
    "only SELECT, SHOW, DESCRIBE, and EXPLAIN statements are allowed";

pub const MULTIPLE_STATEMENTS: &str = "only a single statement is allowed";

/// Classify a query by its leading keyword, rejecting anything else.
///
/// Text with anything but whitespace after a `;` is rejected too, even when
/// the `;` sits inside a string literal.
///
/// # Examples
///
/// ```
/// use mysql_mcp_server::tools::sql_validator::{validate_readonly, ReadStatementKind};
///
/// assert_eq!(validate_readonly("  select 1").unwrap(), ReadStatementKind::Select);
/// assert!(validate_readonly("DELETE FROM users").is_err());
/// ```
pub fn validate_readonly(query: &str) -> DbResult<ReadStatementKind> {
    let folded = query.trim().to_uppercase();
    let kind = ReadStatementKind::PREFIXES
        .iter()
        .find(|(prefix, _)| folded.starts_with(prefix))
        .map(|(_, kind)| *kind)
        .ok_or_else(|| DbError::validation(REJECTED_STATEMENT))?;

    if !is_single_statement(query) {
        return Err(DbError::validation(MULTIPLE_STATEMENTS));
    }
    Ok(kind)
}

/// Append `LIMIT <limit>` to a `SELECT` whose text does not mention `LIMIT`.
///
/// The check is a case-insensitive substring match over the whole text, so a
/// `LIMIT` inside a subquery or string literal also suppresses the append.
/// A trailing `;` is dropped before appending.
pub fn apply_row_limit(query: &str, kind: ReadStatementKind, limit: i64) -> String {
    if kind == ReadStatementKind::Select && !query.to_uppercase().contains("LIMIT") {
        let body = query.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
        format!("{} LIMIT {}", body, limit)
    } else {
        query.to_string()
    }
}
