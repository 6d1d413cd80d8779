//! Engine type to driver resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::config::DatabaseConfig;
use crate::connection::ConnectionDescriptor;
use crate::driver::Driver;
use crate::error::{DatabaseError, DatabaseResult};

/// Constructor of a driver for one engine type.
pub type DriverFactory =
    fn(&DatabaseConfig, ConnectionDescriptor) -> DatabaseResult<Box<dyn Driver>>;

/// Maps engine type names to driver factories.
///
/// ```rust,ignore
/// let registry = DriverRegistry::new()
///     .with_driver("sqlite", quarry_sqlite::factory)
///     .with_alias("sqlite3", "sqlite");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DriverRegistry {
    factories: HashMap<String, DriverFactory>,
    aliases: HashMap<String, String>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for an engine type.
    pub fn register(&mut self, engine: &str, factory: DriverFactory) -> &mut Self {
        self.factories.insert(engine.to_lowercase(), factory);
        self
    }

    /// Register another name for an already known engine type.
    pub fn alias(&mut self, alias: &str, engine: &str) -> &mut Self {
        self.aliases.insert(alias.to_lowercase(), engine.to_lowercase());
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_driver(mut self, engine: &str, factory: DriverFactory) -> Self {
        self.register(engine, factory);
        self
    }

    /// Builder form of [`alias`](Self::alias).
    pub fn with_alias(mut self, alias: &str, engine: &str) -> Self {
        self.alias(alias, engine);
        self
    }

    /// Whether an engine type (or alias) can be resolved.
    pub fn contains(&self, engine: &str) -> bool {
        self.factories.contains_key(&self.canonical(engine))
    }

    /// Registered engine types, sorted.
    pub fn engines(&self) -> Vec<String> {
        let mut engines: Vec<_> = self.factories.keys().cloned().collect();
        engines.sort();
        engines
    }

    fn canonical(&self, engine: &str) -> String {
        let engine = engine.to_lowercase();
        self.aliases.get(&engine).cloned().unwrap_or(engine)
    }

    /// Instantiate the driver for a descriptor and check that it serves the requested engine.
    pub fn create(
        &self,
        config: &DatabaseConfig,
        descriptor: ConnectionDescriptor,
    ) -> DatabaseResult<Box<dyn Driver>> {
        let engine = self.canonical(&descriptor.engine_type);
        let factory = self
            .factories
            .get(&engine)
            .ok_or_else(|| DatabaseError::unsupported_driver(&descriptor.engine_type))?;

        let driver = factory(config, descriptor)?;
        if !driver.engine().eq_ignore_ascii_case(&engine) {
            return Err(DatabaseError::driver_contract(format!(
                "driver registered for '{}' reports engine '{}'",
                engine,
                driver.engine()
            )));
        }

        debug!(engine = %engine, "Driver instantiated");
        Ok(driver)
    }
}
