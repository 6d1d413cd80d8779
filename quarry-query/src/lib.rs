//! # quarry-query
//!
//! Query builder core for Quarry.
//!
//! This crate provides:
//! - [`Database`], a fluent query builder that accumulates clause state and
//!   compiles it through a [`Driver`] on terminal calls (`get`, `insert`,
//!   `update`, `delete`, `merge`, `count_records`)
//! - The [`Driver`] capability contract with ANSI defaults, and a
//!   [`DriverRegistry`] that selects drivers by engine type
//! - Safe positional parameter binding ([`bind`])
//! - A shared, lock-protected [`BenchmarkLog`]
//! - Connection string parsing ([`ConnectionDescriptor`]) and named
//!   configuration groups ([`ConfigGroups`])
//!
//! ## Predicates
//!
//! ```rust
//! use quarry_query::{Condition, IntoConditions, Quote};
//!
//! // Quoted key/value pairs.
//! let conditions = [("status", "active"), ("role", "admin")].into_conditions();
//! assert_eq!(conditions.len(), 2);
//!
//! // A key may carry its operator.
//! let conditions = ("age >=", 18).into_conditions();
//! assert_eq!(conditions[0].key, "age >=");
//!
//! // Trusted SQL passes through unescaped.
//! let conditions = ("total >", "price * 2", Quote::Raw).into_conditions();
//! assert_eq!(conditions[0].quote, Quote::Raw);
//! ```
//!
//! ## Binding
//!
//! ```rust
//! use quarry_query::{binds, bind::bind, sql::escape_value};
//!
//! let sql = bind("SELECT * FROM t WHERE a = ? AND b = ?", &binds![1, "x"], escape_value);
//! assert_eq!(sql, "SELECT * FROM t WHERE a = 1 AND b = 'x'");
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use quarry_query::{ConfigGroups, DEFAULT_GROUP};
//!
//! let groups = ConfigGroups::from_toml(r#"
//!     [database.default]
//!     connection = "sqlite://:memory:"
//!     table_prefix = "app_"
//! "#).unwrap();
//!
//! let config = groups.resolve(DEFAULT_GROUP).unwrap();
//! assert_eq!(config.table_prefix, "app_");
//! assert!(config.benchmark);
//! ```

#[macro_use]
mod macros;

pub mod benchmark;
pub mod bind;
pub mod clause;
pub mod config;
pub mod connection;
pub mod database;
pub mod driver;
pub mod error;
pub mod logging;
pub mod registry;
pub mod result;
pub mod sql;
pub mod state;
pub mod value;

#[cfg(test)]
mod testing;

pub use benchmark::{BenchmarkEntry, BenchmarkLog};
pub use clause::{
    Condition, Connective, IntoAssignments, IntoColumns, IntoConditions, IntoTable, JoinType,
    Quote,
};
pub use config::{ConfigError, ConfigGroups, DEFAULT_GROUP, DatabaseConfig};
pub use connection::ConnectionDescriptor;
pub use database::{ClearCache, Database, DatabaseBuilder};
pub use driver::{Driver, FieldInfo};
pub use error::{DatabaseError, DatabaseResult, ErrorKind};
pub use registry::{DriverFactory, DriverRegistry};
pub use result::{FetchMode, ResultSet, Row};
pub use state::{BuilderState, JoinClause, Predicate};
pub use value::Value;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::binds;
    pub use crate::{
        BenchmarkLog, ClearCache, Condition, ConfigGroups, Database, DatabaseConfig,
        DatabaseError, DatabaseResult, Driver, DriverRegistry, IntoConditions, Quote, ResultSet,
        Row, Value,
    };
}
