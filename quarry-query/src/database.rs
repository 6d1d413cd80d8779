//! The query builder.
//!
//! A [`Database`] accumulates clause state through fluent calls and turns it
//! into SQL on a terminal call:
//!
//! ```rust,ignore
//! use quarry::prelude::*;
//!
//! let mut db = quarry::open("sqlite://:memory:")?;
//! db.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
//! db.insert("users", [("name", "ada")]).await?;
//!
//! let rows = db
//!     .select("id, name")
//!     .r#where(("name", "ada"))
//!     .order_by("id", "desc")
//!     .get("users", None, None)
//!     .await?;
//! assert_eq!(rows.len(), 1);
//! ```
//!
//! Fluent calls never touch the connection. Terminal calls connect lazily,
//! execute, and clear the state scope they consumed once the statement has
//! succeeded; a failed terminal call leaves the state as it was.

use std::fmt;
use std::sync::LazyLock;
use std::time::Instant;

use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::benchmark::{BenchmarkEntry, BenchmarkLog};
use crate::bind;
use crate::clause::{
    Connective, IntoAssignments, IntoColumns, IntoConditions, IntoTable, JoinType,
    normalize_direction,
};
use crate::config::{ConfigGroups, DEFAULT_GROUP, DatabaseConfig};
use crate::connection::{ConnectionDescriptor, SCHEME_SEPARATOR};
use crate::driver::{Driver, FieldInfo};
use crate::error::{DatabaseError, DatabaseResult};
use crate::registry::DriverRegistry;
use crate::result::{FetchMode, ResultSet};
use crate::state::{BuilderState, JoinClause, Predicate};
use crate::value::Value;

static JOIN_EQUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][\w.]*)\s*=\s*([A-Za-z_][\w.]*)\s*$")
        .expect("valid join condition pattern")
});

const COUNT_ALIAS: &str = "records_found";

/// Which cached results [`Database::clear_cache`] drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearCache {
    /// Every cached statement.
    All,
    /// The most recently executed statement.
    Last,
    /// One statement.
    Statement(String),
}

#[derive(Debug, Clone, Copy)]
enum PredicateKind {
    Where,
    Like,
    NotLike,
    Regex,
    NotRegex,
}

/// Builder for opening a [`Database`].
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    registry: DriverRegistry,
    groups: ConfigGroups,
    benchmarks: Option<BenchmarkLog>,
}

impl DatabaseBuilder {
    /// Create a builder with no drivers and no configuration groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the driver registry.
    pub fn registry(mut self, registry: DriverRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the named configuration groups.
    pub fn groups(mut self, groups: ConfigGroups) -> Self {
        self.groups = groups;
        self
    }

    /// Add one named configuration group.
    pub fn group(mut self, name: impl Into<String>, config: DatabaseConfig) -> Self {
        self.groups = self.groups.with_group(name, config);
        self
    }

    /// Record benchmarks into this log instead of the process-wide one.
    pub fn benchmarks(mut self, log: BenchmarkLog) -> Self {
        self.benchmarks = Some(log);
        self
    }

    /// Resolve a selector into a configuration.
    ///
    /// An empty selector names the `default` group, a selector containing
    /// `://` is a DSN, anything else is a group name.
    pub fn resolve(&self, selector: &str) -> DatabaseResult<DatabaseConfig> {
        let selector = selector.trim();
        if selector.is_empty() {
            Ok(self.groups.resolve(DEFAULT_GROUP)?)
        } else if selector.contains(SCHEME_SEPARATOR) {
            Ok(DatabaseConfig::from_dsn(selector))
        } else {
            Ok(self.groups.resolve(selector)?)
        }
    }

    /// Open a database from a selector (see [`resolve`](Self::resolve)).
    pub fn open(self, selector: &str) -> DatabaseResult<Database> {
        let config = self.resolve(selector)?;
        self.open_config(config)
    }

    /// Open a database from an explicit configuration.
    pub fn open_config(self, config: DatabaseConfig) -> DatabaseResult<Database> {
        let benchmarks = self.benchmarks.unwrap_or_else(BenchmarkLog::global);
        Database::new(config, &self.registry, benchmarks)
    }
}

/// A query builder bound to one driver instance and one connection.
pub struct Database {
    config: DatabaseConfig,
    descriptor: ConnectionDescriptor,
    driver: Box<dyn Driver>,
    state: BuilderState,
    benchmarks: BenchmarkLog,
    last_query: Option<String>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("engine", &self.driver.engine())
            .field("descriptor", &self.descriptor.to_string())
            .field("connected", &self.driver.is_connected())
            .field("state", &self.state)
            .field("last_query", &self.last_query)
            .finish()
    }
}

impl Database {
    /// Start building a database handle.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Create a handle from a configuration, instantiating the driver from `registry`.
    pub fn new(
        config: DatabaseConfig,
        registry: &DriverRegistry,
        benchmarks: BenchmarkLog,
    ) -> DatabaseResult<Self> {
        let descriptor = parse_connection(&config)?;
        let driver = registry.create(&config, descriptor.clone())?;
        Ok(Self::assemble(config, descriptor, driver, benchmarks))
    }

    /// Create a handle around an already constructed driver.
    pub fn with_driver(
        config: DatabaseConfig,
        driver: Box<dyn Driver>,
        benchmarks: BenchmarkLog,
    ) -> DatabaseResult<Self> {
        let descriptor = parse_connection(&config)?;
        if !driver.engine().eq_ignore_ascii_case(&descriptor.engine_type) {
            return Err(DatabaseError::driver_contract(format!(
                "driver for '{}' given a '{}' connection",
                driver.engine(),
                descriptor.engine_type
            )));
        }
        Ok(Self::assemble(config, descriptor, driver, benchmarks))
    }

    fn assemble(
        config: DatabaseConfig,
        descriptor: ConnectionDescriptor,
        driver: Box<dyn Driver>,
        benchmarks: BenchmarkLog,
    ) -> Self {
        debug!(
            engine = %descriptor.engine_type,
            dsn = %descriptor,
            benchmark = config.benchmark,
            cache = config.cache,
            "Database instance created"
        );
        Self {
            config,
            descriptor,
            driver,
            state: BuilderState::new(),
            benchmarks,
            last_query: None,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The parsed connection string.
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// The configured table prefix.
    pub fn table_prefix(&self) -> &str {
        &self.config.table_prefix
    }

    /// The accumulated clause state.
    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// The benchmark log this handle records into.
    pub fn benchmarks(&self) -> &BenchmarkLog {
        &self.benchmarks
    }

    /// The most recently executed SQL text.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Whether the driver connection is open.
    pub fn is_connected(&self) -> bool {
        self.driver.is_connected()
    }

    /// Open the connection now rather than on first use.
    pub async fn connect(&mut self) -> DatabaseResult<()> {
        if self.driver.is_connected() {
            return Ok(());
        }
        self.driver.connect().await?;
        info!(engine = %self.descriptor.engine_type, dsn = %self.descriptor, "Database connected");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Escaping
    // ------------------------------------------------------------------

    /// Render a value as a literal of this driver.
    pub fn escape(&self, value: impl Into<Value>) -> String {
        self.driver.escape(&value.into())
    }

    /// Escape text for a single-quoted literal, without the quotes.
    pub fn escape_str(&self, text: &str) -> String {
        self.driver.escape_str(text)
    }

    /// Quote a column reference.
    pub fn escape_column(&self, column: &str) -> String {
        self.driver.escape_column(column)
    }

    /// Substitute `?` markers in `sql` with escaped values.
    pub fn compile_binds<I, V>(&self, sql: &str, binds: I) -> String
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = binds.into_iter().map(Into::into).collect();
        bind::bind(sql, &values, |value| self.driver.escape(value))
    }

    fn prefixed(&self, name: &str) -> String {
        if name.contains('.') {
            format!("{}{}", self.config.table_prefix, name)
        } else {
            name.to_string()
        }
    }

    fn prefixed_table(&self, name: &str) -> String {
        self.driver
            .escape_table(&format!("{}{}", self.config.table_prefix, name))
    }

    /// Prefix and quote a table reference, keeping an optional alias.
    fn render_table(&self, table: &str) -> String {
        let table = table.trim();
        if table.contains('(') {
            return table.to_string();
        }

        let upper = table.to_ascii_uppercase();
        if let Some(idx) = upper.find(" AS ") {
            let alias = table[idx + 4..].trim();
            return format!(
                "{} AS {}",
                self.prefixed_table(table[..idx].trim()),
                self.driver.escape_column(alias)
            );
        }

        match table.split_once(char::is_whitespace) {
            Some((name, alias)) => format!(
                "{} {}",
                self.prefixed_table(name),
                self.driver.escape_column(alias.trim())
            ),
            None => self.prefixed_table(table),
        }
    }

    // ------------------------------------------------------------------
    // Fluent clause methods
    // ------------------------------------------------------------------

    /// Add select expressions. `*` and expressions containing `(` are kept verbatim.
    pub fn select(&mut self, columns: impl IntoColumns) -> &mut Self {
        for column in columns.into_columns() {
            let rendered = if column == "*" || column.contains('(') {
                column
            } else {
                self.driver.escape_column(&self.prefixed(&column))
            };
            self.state.select.push(rendered);
        }
        self
    }

    /// Select distinct rows.
    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.state.distinct = distinct;
        self
    }

    /// Add source tables.
    pub fn from(&mut self, tables: impl IntoColumns) -> &mut Self {
        for table in tables.into_columns() {
            let rendered = self.render_table(&table);
            self.state.from.push(rendered);
        }
        self
    }

    /// Add a join.
    ///
    /// `kind` is one of `LEFT`, `RIGHT`, `OUTER`, `INNER`, `LEFT OUTER`,
    /// `RIGHT OUTER` in any case; anything else gives a plain `JOIN`. A
    /// condition of the shape `a.b = c.d` has both sides prefixed and quoted;
    /// other conditions are used verbatim.
    pub fn join(&mut self, table: &str, condition: &str, kind: &str) -> &mut Self {
        let condition = match JOIN_EQUALITY.captures(condition) {
            Some(caps) => format!(
                "{} = {}",
                self.driver.escape_column(&self.prefixed(&caps[1])),
                self.driver.escape_column(&self.prefixed(&caps[2]))
            ),
            None => condition.trim().to_string(),
        };

        let join = JoinClause {
            kind: JoinType::parse(kind),
            table: self.render_table(table),
            condition,
        };
        self.state.joins.push(join);
        self
    }

    fn add_predicates(
        &mut self,
        input: impl IntoConditions,
        connective: Connective,
        kind: PredicateKind,
    ) -> &mut Self {
        for mut condition in input.into_conditions() {
            condition.key = self.prefixed(&condition.key);

            let position = self.state.next_predicate_position();
            let driver = &self.driver;
            let sql = match kind {
                PredicateKind::Where => driver.compile_where(&condition, connective, position),
                PredicateKind::Like => driver.compile_like(&condition, connective, position),
                PredicateKind::NotLike => driver.compile_not_like(&condition, connective, position),
                PredicateKind::Regex => driver.compile_regex(&condition, connective, position),
                PredicateKind::NotRegex => {
                    driver.compile_not_regex(&condition, connective, position)
                }
            };

            self.state.predicates.push(Predicate {
                connective,
                position,
                sql,
            });
        }
        self
    }

    fn add_having(&mut self, input: impl IntoConditions, connective: Connective) -> &mut Self {
        for mut condition in input.into_conditions() {
            condition.key = self.prefixed(&condition.key);
            let position = self.state.next_having_position();
            let sql = self.driver.compile_having(&condition, connective, position);
            self.state.having.push(Predicate {
                connective,
                position,
                sql,
            });
        }
        self
    }

    /// Add `AND` predicates.
    ///
    /// Accepts a `(key, value)` pair, a `(key, value, Quote)` triple, a bare
    /// SQL expression (emitted without escaping), or a sequence or map of pairs.
    pub fn r#where(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::And, PredicateKind::Where)
    }

    /// Add `OR` predicates.
    pub fn or_where(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::Or, PredicateKind::Where)
    }

    /// Add `AND ... LIKE` predicates.
    pub fn like(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::And, PredicateKind::Like)
    }

    /// Add `OR ... LIKE` predicates.
    pub fn or_like(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::Or, PredicateKind::Like)
    }

    /// Add `AND ... NOT LIKE` predicates.
    pub fn not_like(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::And, PredicateKind::NotLike)
    }

    /// Add `OR ... NOT LIKE` predicates.
    pub fn or_not_like(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::Or, PredicateKind::NotLike)
    }

    /// Add `AND ... REGEXP` predicates.
    pub fn regex(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::And, PredicateKind::Regex)
    }

    /// Add `OR ... REGEXP` predicates.
    pub fn or_regex(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::Or, PredicateKind::Regex)
    }

    /// Add `AND ... NOT REGEXP` predicates.
    pub fn not_regex(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::And, PredicateKind::NotRegex)
    }

    /// Add `OR ... NOT REGEXP` predicates.
    pub fn or_not_regex(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_predicates(conditions, Connective::Or, PredicateKind::NotRegex)
    }

    /// Add `GROUP BY` columns. Repeated columns are kept once.
    pub fn group_by(&mut self, columns: impl IntoColumns) -> &mut Self {
        for column in columns.into_columns() {
            let rendered = self.driver.escape_column(&self.prefixed(&column));
            self.state.group_by.insert(rendered);
        }
        self
    }

    /// Add `AND` `HAVING` predicates.
    pub fn having(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_having(conditions, Connective::And)
    }

    /// Add `OR` `HAVING` predicates.
    pub fn or_having(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.add_having(conditions, Connective::Or)
    }

    /// Add one `ORDER BY` fragment.
    ///
    /// `columns` may list several comma-separated columns; the direction is
    /// appended after the last one. With no columns only the direction is
    /// added, e.g. `order_by("", "RANDOM()")`.
    pub fn order_by(&mut self, columns: &str, direction: &str) -> &mut Self {
        let direction = normalize_direction(direction);
        let columns = columns.into_columns();

        let mut fragment = columns
            .iter()
            .map(|column| self.driver.escape_column(&self.prefixed(column)))
            .collect::<Vec<_>>()
            .join(", ");

        if let Some(direction) = direction {
            if !fragment.is_empty() {
                fragment.push(' ');
            }
            fragment.push_str(direction);
        }

        if !fragment.is_empty() {
            self.state.order_by.push(fragment);
        }
        self
    }

    /// Limit the number of rows.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.state.limit = Some(limit);
        self
    }

    /// Skip rows.
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.state.offset = Some(offset);
        self
    }

    /// Add column/value pairs for the next write. Values are escaped immediately.
    pub fn set(&mut self, pairs: impl IntoAssignments) -> &mut Self {
        for (column, value) in pairs.into_assignments() {
            let escaped = self.driver.escape(&value);
            self.state.set.insert(column, escaped);
        }
        self
    }

    /// Clear the read scope of the builder state.
    pub fn reset_select(&mut self) -> &mut Self {
        self.state.reset_select();
        self
    }

    /// Clear the write scope of the builder state.
    pub fn reset_write(&mut self) -> &mut Self {
        self.state.reset_write();
        self
    }

    /// The `SELECT` statement the current state compiles to.
    pub fn compile_select(&self) -> String {
        self.driver.compile_select(&self.state)
    }

    // ------------------------------------------------------------------
    // Terminal calls
    // ------------------------------------------------------------------

    /// Run the accumulated `SELECT`.
    pub async fn get(
        &mut self,
        table: impl IntoTable,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> DatabaseResult<ResultSet> {
        if let Some(table) = table.into_table() {
            self.from(table);
        }
        if let Some(limit) = limit {
            self.limit(limit);
        }
        if let Some(offset) = offset {
            self.offset(offset);
        }

        let sql = self.driver.compile_select(&self.state);
        let result = self.query(&sql).await?;
        self.state.reset_select();
        Ok(result)
    }

    /// Add predicates, then run the accumulated `SELECT`.
    pub async fn get_where(
        &mut self,
        table: impl IntoTable,
        conditions: impl IntoConditions,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> DatabaseResult<ResultSet> {
        self.r#where(conditions);
        self.get(table, limit, offset).await
    }

    /// Insert one row built from `set` pairs.
    pub async fn insert(
        &mut self,
        table: impl IntoTable,
        set: impl IntoAssignments,
    ) -> DatabaseResult<ResultSet> {
        self.set(set);
        self.require_set()?;
        let table = self.write_table(table.into_table())?;

        let sql = self.driver.compile_insert(&table, &self.state.set);
        self.run_write(sql).await
    }

    /// Insert one row, replacing any row with the same key.
    pub async fn merge(
        &mut self,
        table: impl IntoTable,
        set: impl IntoAssignments,
    ) -> DatabaseResult<ResultSet> {
        self.set(set);
        self.require_set()?;
        let table = self.write_table(table.into_table())?;

        let sql = self.driver.compile_merge(&table, &self.state.set);
        self.run_write(sql).await
    }

    /// Update rows matching the accumulated predicates.
    pub async fn update(
        &mut self,
        table: impl IntoTable,
        set: impl IntoAssignments,
        conditions: impl IntoConditions,
    ) -> DatabaseResult<ResultSet> {
        self.set(set);
        self.r#where(conditions);
        self.require_set()?;
        let table = self.write_table(table.into_table())?;

        let sql = self
            .driver
            .compile_update(&table, &self.state.set, &self.state.predicates);
        self.run_write(sql).await
    }

    /// Delete rows matching the accumulated predicates.
    ///
    /// Refuses to run without at least one predicate.
    pub async fn delete(
        &mut self,
        table: impl IntoTable,
        conditions: impl IntoConditions,
    ) -> DatabaseResult<ResultSet> {
        let table = self.write_table(table.into_table())?;
        self.r#where(conditions);
        if self.state.predicates.is_empty() {
            warn!(table = %table, "Refusing DELETE without WHERE");
            return Err(DatabaseError::missing_where());
        }

        let sql = self.driver.compile_delete(&table, &self.state.predicates);
        self.run_write(sql).await
    }

    /// Count rows in a table, optionally filtered.
    ///
    /// `table` is only used when no table was recorded through [`from`](Self::from).
    pub async fn count_records(
        &mut self,
        table: impl IntoTable,
        conditions: impl IntoConditions,
    ) -> DatabaseResult<i64> {
        if self.state.from.is_empty() {
            let table = table.into_table().ok_or_else(DatabaseError::missing_table)?;
            self.from(table);
        }
        self.r#where(conditions);

        let alias = self.driver.escape_column(COUNT_ALIAS);
        self.select(format!("COUNT(*) AS {alias}"));

        let result = self.get((), None, None).await?;
        result
            .current()
            .and_then(|row| row.get(COUNT_ALIAS))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                DatabaseError::query("count query returned no records_found column")
            })
    }

    fn require_set(&self) -> DatabaseResult<()> {
        if self.state.set.is_empty() {
            warn!("Write attempted without SET pairs");
            return Err(DatabaseError::missing_set());
        }
        Ok(())
    }

    fn write_table(&self, table: Option<String>) -> DatabaseResult<String> {
        match table {
            Some(table) => Ok(self.render_table(&table)),
            None => self.state.from.first().cloned().ok_or_else(|| {
                warn!("Write attempted without a table");
                DatabaseError::missing_table()
            }),
        }
    }

    async fn run_write(&mut self, sql: String) -> DatabaseResult<ResultSet> {
        if self.config.cache {
            self.driver.clear_cache(None);
        }
        let result = self.query(&sql).await?;
        self.state.reset_write();
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Raw execution
    // ------------------------------------------------------------------

    /// Execute a SQL statement.
    pub async fn query(&mut self, sql: &str) -> DatabaseResult<ResultSet> {
        self.execute(sql.to_string()).await
    }

    /// Execute a SQL statement after substituting `?` markers with `binds`.
    ///
    /// ```rust,ignore
    /// db.query_with("SELECT * FROM users WHERE id = ? AND name = ?", binds![1, "ada"]).await?;
    /// ```
    pub async fn query_with<I, V>(&mut self, sql: &str, binds: I) -> DatabaseResult<ResultSet>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let sql = self.compile_binds(sql, binds);
        self.execute(sql).await
    }

    async fn execute(&mut self, sql: String) -> DatabaseResult<ResultSet> {
        if sql.trim().is_empty() {
            return Err(DatabaseError::query("empty SQL statement"));
        }

        self.connect().await?;

        let start = Instant::now();
        self.last_query = Some(sql.clone());
        let result = match self.driver.execute(&sql).await {
            Ok(result) => result,
            Err(err) => {
                warn!(sql = %sql, error = %err, "Query failed");
                return Err(err.with_sql(sql));
            }
        };
        let elapsed = start.elapsed();

        let result = result.with_fetch_mode(FetchMode::from_object_flag(self.config.object));
        debug!(
            sql = %sql,
            rows = result.total_rows(),
            elapsed_us = elapsed.as_micros() as u64,
            "Query executed"
        );

        if self.config.benchmark {
            self.benchmarks.record(BenchmarkEntry {
                sql,
                elapsed,
                rows: result.total_rows(),
            });
        }

        Ok(result)
    }

    // ------------------------------------------------------------------
    // Metadata and cache
    // ------------------------------------------------------------------

    /// Names of all tables.
    pub async fn list_tables(&mut self) -> DatabaseResult<Vec<String>> {
        self.connect().await?;
        self.driver.list_tables().await
    }

    /// Whether a table exists. The table prefix is applied to `table`.
    pub async fn table_exists(&mut self, table: &str) -> DatabaseResult<bool> {
        let name = format!("{}{}", self.config.table_prefix, table);
        Ok(self.list_tables().await?.contains(&name))
    }

    /// Column descriptions of a table. The table prefix is applied.
    pub async fn field_data(&mut self, table: &str) -> DatabaseResult<Vec<FieldInfo>> {
        self.connect().await?;
        let name = format!("{}{}", self.config.table_prefix, table);
        self.driver.field_data(&name).await
    }

    /// Column names of a table. The table prefix is applied.
    pub async fn list_fields(&mut self, table: &str) -> DatabaseResult<Vec<String>> {
        self.connect().await?;
        let name = format!("{}{}", self.config.table_prefix, table);
        self.driver.list_fields(&name).await
    }

    /// Drop cached results.
    pub fn clear_cache(&mut self, target: ClearCache) {
        match target {
            ClearCache::All => self.driver.clear_cache(None),
            ClearCache::Last => {
                if let Some(sql) = self.last_query.as_deref() {
                    self.driver.clear_cache(Some(sql));
                }
            }
            ClearCache::Statement(sql) => self.driver.clear_cache(Some(&sql)),
        }
    }
}

fn parse_connection(config: &DatabaseConfig) -> DatabaseResult<ConnectionDescriptor> {
    if !config.connection.contains(SCHEME_SEPARATOR) {
        return Err(DatabaseError::configuration(format!(
            "invalid DSN: '{}'",
            crate::connection::mask_password(&config.connection)
        )));
    }
    ConnectionDescriptor::parse(&config.connection)
}
