//! Error types and handling
//!
//! Database failures are reduced to two shapes: the server could not be
//! reached (or refused our credentials), or it rejected a statement. Statement
//! errors keep the SQLSTATE reported by PostgreSQL so callers can classify
//! them without inspecting human-readable messages.

use thiserror::Error;

/// SQLSTATE raised by `CREATE DATABASE` when the name is taken
pub const SQLSTATE_DUPLICATE_DATABASE: &str = "42P04";

/// SQLSTATE raised when a referenced column does not exist
pub const SQLSTATE_UNDEFINED_COLUMN: &str = "42703";

/// SQLSTATE raised when a referenced table does not exist
pub const SQLSTATE_UNDEFINED_TABLE: &str = "42P01";

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    /// Network, TLS or authentication failure while talking to the server
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement rejected by the server
    #[error("{message}")]
    Statement {
        /// SQLSTATE, when the server reported one
        code: Option<String>,
        message: String,
    },
}

impl DbError {
    /// Build a statement error with an explicit SQLSTATE
    pub fn statement(code: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::Statement {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// SQLSTATE of a statement error
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            DbError::Statement { code, .. } => code.as_deref(),
            DbError::Connection(_) => None,
        }
    }

    /// Whether the server reported `duplicate_database`
    pub fn is_duplicate_database(&self) -> bool {
        self.sqlstate() == Some(SQLSTATE_DUPLICATE_DATABASE)
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection(_))
    }

    /// Reclassify any error raised during connection setup.
    ///
    /// Authentication failures arrive as database errors (`28P01`), but to
    /// the caller they are part of "could not connect".
    pub fn from_connect(err: sqlx::Error) -> Self {
        DbError::Connection(err.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::Statement {
                code: db_err.code().map(|c| c.into_owned()),
                message: db_err.message().to_string(),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DbError::Connection(err.to_string()),
            _ => DbError::Statement {
                code: None,
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DbError>;
