//! Error types for SQLite operations.

use quarry_query::DatabaseError;
use thiserror::Error;

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

/// Error type for SQLite operations.
#[derive(Error, Debug)]
pub enum SqliteError {
    /// Error reported by SQLite while running a statement.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),

    /// Invalid driver configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database could not be opened or initialised.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement was issued before connecting.
    #[error("Not connected")]
    NotConnected,
}

impl SqliteError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// The message SQLite itself produced, without wrapper prefixes.
    pub fn native_message(&self) -> String {
        match self {
            Self::Sqlite(tokio_rusqlite::Error::Rusqlite(e)) => e.to_string(),
            Self::Sqlite(e) => e.to_string(),
            Self::Config(msg) | Self::Connection(msg) => msg.clone(),
            Self::NotConnected => self.to_string(),
        }
    }
}

impl From<rusqlite::Error> for SqliteError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(tokio_rusqlite::Error::Rusqlite(err))
    }
}

impl From<SqliteError> for DatabaseError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Config(msg) => DatabaseError::configuration(msg),
            SqliteError::Connection(msg) => DatabaseError::connection(msg),
            SqliteError::NotConnected => DatabaseError::connection("not connected"),
            other @ SqliteError::Sqlite(_) => DatabaseError::query(other.native_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_query::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = SqliteError::config("unsupported character set: latin1");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("latin1"));
    }

    #[test]
    fn test_conversion_kinds() {
        let err: DatabaseError = SqliteError::connection("unable to open database file").into();
        assert_eq!(err.kind(), ErrorKind::Connection);

        let err: DatabaseError = SqliteError::config("bad").into();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err: DatabaseError = SqliteError::NotConnected.into();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[test]
    fn test_native_message_is_unwrapped() {
        let err = SqliteError::from(rusqlite::Error::InvalidQuery);
        let converted: DatabaseError = err.into();
        assert_eq!(converted.kind(), ErrorKind::Query);
        assert!(!converted.to_string().contains("SQLite error"));
    }
}
