//! SQLite configuration.

use std::path::{Path, PathBuf};

use quarry_query::{ConnectionDescriptor, DatabaseConfig};

use crate::error::{SqliteError, SqliteResult};

/// Milliseconds a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// SQLite driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Database path (or `:memory:`).
    pub path: DatabasePath,
    /// Value for `PRAGMA encoding`.
    pub encoding: &'static str,
    /// Share one connection per path across the process.
    pub persistent: bool,
    /// Cache results of read statements.
    pub cache: bool,
}

/// Database path configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabasePath {
    /// In-memory database.
    #[default]
    Memory,
    /// File-based database.
    File(PathBuf),
}

impl DatabasePath {
    /// Path text as SQLite understands it.
    pub fn as_str(&self) -> String {
        match self {
            Self::Memory => ":memory:".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Check if this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: DatabasePath::Memory,
            encoding: "UTF-8",
            persistent: false,
            cache: false,
        }
    }
}

impl SqliteConfig {
    /// Configuration for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Configuration for a file-based database.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            path: DatabasePath::File(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// Derive the driver configuration from the generic settings and parsed DSN.
    pub fn from_database_config(
        config: &DatabaseConfig,
        descriptor: &ConnectionDescriptor,
    ) -> SqliteResult<Self> {
        let file = descriptor.file_path();
        let path = match file.as_str() {
            "" => return Err(SqliteError::config("database path is required")),
            ":memory:" => DatabasePath::Memory,
            other => DatabasePath::File(PathBuf::from(other)),
        };

        Ok(Self {
            path,
            encoding: encoding_pragma(&config.character_set)?,
            persistent: config.persistent,
            cache: config.cache,
        })
    }

    /// Statements run right after opening a connection.
    ///
    /// Foreign keys are always enforced.
    pub fn init_sql(&self) -> String {
        format!(
            "PRAGMA encoding = '{}';\nPRAGMA foreign_keys = ON;\nPRAGMA busy_timeout = {};\n",
            self.encoding, BUSY_TIMEOUT_MS
        )
    }

    /// Share one connection per path across the process.
    pub fn persistent(mut self, enabled: bool) -> Self {
        self.persistent = enabled;
        self
    }

    /// Cache results of read statements.
    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }
}

/// Map a configured character set onto a `PRAGMA encoding` value.
pub fn encoding_pragma(charset: &str) -> SqliteResult<&'static str> {
    let normalized: String = charset
        .chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .collect::<String>()
        .to_lowercase();

    match normalized.as_str() {
        "" | "utf8" | "utf8mb4" => Ok("UTF-8"),
        "utf16" => Ok("UTF-16"),
        "utf16le" => Ok("UTF-16le"),
        "utf16be" => Ok("UTF-16be"),
        _ => Err(SqliteError::config(format!(
            "unsupported character set: {}",
            charset
        ))),
    }
}
