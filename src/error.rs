//! Error types for the MySQL MCP Server.
//!
//! Tool invocations fail in one of two ways: the caller supplied bad arguments
//! (`Validation`, reported before any SQL is issued) or the database rejected
//! or could not run a statement (`Execution`). `Internal` covers failures that
//! happen around the engine, such as serializing a result or binding a socket.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Execution {
        message: String,
        /// e.g., "42S02" for unknown table
        sql_state: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an execution error with optional SQL state.
    pub fn execution(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Execution {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Prefix an execution error with the operation that failed.
    ///
    /// Validation and internal errors are returned unchanged.
    pub fn context(self, context: &str) -> Self {
        match self {
            Self::Execution { message, sql_state } => Self::Execution {
                message: format!("{}: {}", context, message),
                sql_state,
            },
            other => other,
        }
    }

    /// Check if this error was raised before any statement ran.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Execution { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// Every driver failure is an execution error; server-side errors keep their SQLSTATE.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::execution(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => DbError::execution("no rows returned", None),
            sqlx::Error::PoolTimedOut => {
                DbError::execution("timed out acquiring a database connection", None)
            }
            sqlx::Error::PoolClosed => DbError::execution("connection pool is closed", None),
            sqlx::Error::Io(io_err) => DbError::execution(format!("I/O error: {}", io_err), None),
            sqlx::Error::Tls(tls_err) => {
                DbError::execution(format!("TLS error: {}", tls_err), None)
            }
            sqlx::Error::ColumnDecode { index, source } => DbError::execution(
                format!("failed to decode column {}: {}", index, source),
                None,
            ),
            other => DbError::execution(other.to_string(), None),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Convert DbError to MCP ErrorData.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::Validation { .. } => rmcp::ErrorData::invalid_params(err.to_string(), None),
            DbError::Execution { message, sql_state } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::internal_error(msg, None)
            }
            DbError::Internal { .. } => rmcp::ErrorData::internal_error(err.to_string(), None),
        }
    }
}
