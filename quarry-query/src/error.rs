//! Error types for database operations.
//!
//! Every failure the query layer can produce is a distinct [`DatabaseError`]
//! variant so callers can match on the kind of problem:
//!
//! ```rust
//! use quarry_query::{DatabaseError, ErrorKind};
//!
//! let err = DatabaseError::missing_where();
//! assert_eq!(err.kind(), ErrorKind::MissingWhere);
//! assert!(err.to_string().contains("WHERE"));
//! ```
//!
//! Nothing is retried internally; retry policy belongs to the caller.

use std::fmt;

use thiserror::Error;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Coarse classification of a [`DatabaseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration group missing or malformed connection string.
    Configuration,
    /// No driver registered for the engine type.
    UnsupportedDriver,
    /// The instantiated driver does not honour the driver contract.
    DriverContract,
    /// The driver could not establish a connection.
    Connection,
    /// The engine rejected or failed to execute a statement.
    Query,
    /// A write was attempted without any column/value pairs.
    MissingSet,
    /// A write, delete or count has no resolvable table.
    MissingTable,
    /// A delete was attempted without any predicate.
    MissingWhere,
    /// Row data could not be converted into the requested type.
    Serialization,
}

impl ErrorKind {
    /// Message key used in log output (e.g. `database.must_use_set`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Configuration => "database.configuration",
            Self::UnsupportedDriver => "database.driver_not_supported",
            Self::DriverContract => "database.driver_contract",
            Self::Connection => "database.connection",
            Self::Query => "database.query",
            Self::MissingSet => "database.must_use_set",
            Self::MissingTable => "database.must_use_table",
            Self::MissingWhere => "database.must_use_where",
            Self::Serialization => "database.serialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors produced by the query builder, the drivers and configuration.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Named configuration group not found, or malformed connection string.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The engine type has no registered driver.
    #[error("Unsupported database driver: {0}")]
    UnsupportedDriver(String),

    /// The driver does not satisfy the driver contract.
    #[error("Driver contract violation: {0}")]
    DriverContract(String),

    /// The driver could not connect.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The engine rejected a statement.
    #[error("Query error: {message}")]
    Query {
        /// Native error message from the engine.
        message: String,
        /// The statement that failed, when known.
        sql: Option<String>,
    },

    /// `insert`, `update` or `merge` without any `set` pairs.
    #[error("You must set a SET clause for your query")]
    MissingSet,

    /// No table given and none recorded through `from`.
    #[error("You must set a database table for your query")]
    MissingTable,

    /// `delete` without any predicate.
    #[error("You must set a WHERE clause for your query")]
    MissingWhere,

    /// Row decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DatabaseError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an unsupported driver error.
    pub fn unsupported_driver(engine: impl Into<String>) -> Self {
        Self::UnsupportedDriver(engine.into())
    }

    /// Create a driver contract error.
    pub fn driver_contract(msg: impl Into<String>) -> Self {
        Self::DriverContract(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a query error without statement context.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query {
            message: msg.into(),
            sql: None,
        }
    }

    /// Create a query error for a specific statement.
    pub fn query_with_sql(msg: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::Query {
            message: msg.into(),
            sql: Some(sql.into()),
        }
    }

    /// Create a missing SET error.
    pub fn missing_set() -> Self {
        Self::MissingSet
    }

    /// Create a missing table error.
    pub fn missing_table() -> Self {
        Self::MissingTable
    }

    /// Create a missing WHERE error.
    pub fn missing_where() -> Self {
        Self::MissingWhere
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::UnsupportedDriver(_) => ErrorKind::UnsupportedDriver,
            Self::DriverContract(_) => ErrorKind::DriverContract,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Query { .. } => ErrorKind::Query,
            Self::MissingSet => ErrorKind::MissingSet,
            Self::MissingTable => ErrorKind::MissingTable,
            Self::MissingWhere => ErrorKind::MissingWhere,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// The failing statement, for query errors that carry one.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Query { sql, .. } => sql.as_deref(),
            _ => None,
        }
    }

    /// Attach the failing statement to a query error. Other kinds are returned unchanged.
    pub fn with_sql(self, statement: impl Into<String>) -> Self {
        match self {
            Self::Query { message, sql: None } => Self::Query {
                message,
                sql: Some(statement.into()),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatabaseError::configuration("undefined group: reporting");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("reporting"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(DatabaseError::missing_set().kind(), ErrorKind::MissingSet);
        assert_eq!(DatabaseError::missing_table().kind(), ErrorKind::MissingTable);
        assert_eq!(
            DatabaseError::unsupported_driver("oracle").kind(),
            ErrorKind::UnsupportedDriver
        );
        assert_eq!(DatabaseError::query("boom").kind(), ErrorKind::Query);
    }

    #[test]
    fn test_with_sql_only_fills_missing_statement() {
        let err = DatabaseError::query("no such table: users").with_sql("SELECT * FROM users");
        assert_eq!(err.sql(), Some("SELECT * FROM users"));

        let err = err.with_sql("SELECT 1");
        assert_eq!(err.sql(), Some("SELECT * FROM users"));

        let err = DatabaseError::missing_where().with_sql("DELETE FROM users");
        assert!(err.sql().is_none());
    }

    #[test]
    fn test_kind_keys() {
        assert_eq!(ErrorKind::MissingWhere.key(), "database.must_use_where");
        assert_eq!(ErrorKind::UnsupportedDriver.to_string(), "database.driver_not_supported");
    }
}
