//! SQLite driver for Quarry.
//!
//! This crate implements the [`quarry_query::Driver`] contract on top of
//! `tokio-rusqlite`.
//!
//! # Features
//!
//! - Async/await support via `tokio-rusqlite`
//! - In-memory and file-based databases
//! - `REGEXP` support through a registered scalar function
//! - Optional process-wide connection sharing and result caching
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry_query::{BenchmarkLog, DatabaseConfig, DriverRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quarry_query::DatabaseError> {
//!     let mut registry = DriverRegistry::new();
//!     quarry_sqlite::register(&mut registry);
//!
//!     let config = DatabaseConfig::from_dsn("sqlite://./app.db");
//!     let mut db = quarry_query::Database::new(config, &registry, BenchmarkLog::new())?;
//!     let users = db.select("id, name").from("users").get((), None, None).await?;
//!     println!("{} users", users.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod functions;
pub mod types;

pub use config::{BUSY_TIMEOUT_MS, DatabasePath, SqliteConfig};
pub use driver::{ENGINE, SqliteDriver, factory, is_write_statement};
pub use error::{SqliteError, SqliteResult};

use quarry_query::DriverRegistry;

/// Engine aliases accepted in connection strings.
pub const ALIASES: &[&str] = &["sqlite3"];

/// Register the SQLite driver and its aliases.
pub fn register(registry: &mut DriverRegistry) {
    registry.register(ENGINE, factory);
    for alias in ALIASES {
        registry.alias(alias, ENGINE);
    }
}
