//! # Quarry
//!
//! Fluent SQL query building and execution with pluggable database drivers.
//!
//! Quarry provides:
//! - A query builder that accumulates clause state and compiles it through
//!   an engine specific driver
//! - Safe positional parameter binding
//! - A shared benchmark log of every executed statement
//! - A SQLite driver built on `tokio-rusqlite`
//!
//! ## Quick Start
//!
//! ```rust
//! use quarry::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let mut db = quarry::builder().open("sqlite://:memory:")?;
//!
//!     db.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
//!     db.insert("users", [("name", "ada")]).await?;
//!
//!     let users = db.select("id, name").r#where(("name", "ada")).get("users", None, None).await?;
//!     assert_eq!(users.len(), 1);
//!
//!     let found = db
//!         .query_with("SELECT * FROM users WHERE name = ?", binds!["ada"])
//!         .await?;
//!     assert_eq!(found.total_rows(), 1);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use quarry_query;
pub use quarry_sqlite;

pub use quarry_query::{
    BenchmarkEntry, BenchmarkLog, ClearCache, Condition, ConfigError, ConfigGroups,
    ConnectionDescriptor, DEFAULT_GROUP, Database, DatabaseBuilder, DatabaseConfig,
    DatabaseError, DatabaseResult, Driver, DriverRegistry, ErrorKind, FetchMode, FieldInfo,
    Quote, ResultSet, Row, Value, binds,
};

/// A registry with every bundled driver registered.
pub fn default_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    quarry_sqlite::register(&mut registry);
    registry
}

/// A [`DatabaseBuilder`] using [`default_registry`].
pub fn builder() -> DatabaseBuilder {
    Database::builder().registry(default_registry())
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use quarry_query::prelude::*;
    pub use quarry_query::{ErrorKind, FieldInfo, JoinType};
    pub use quarry_sqlite::{SqliteConfig, SqliteDriver};
}
