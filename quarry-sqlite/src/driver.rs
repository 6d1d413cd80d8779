//! SQLite implementation of the driver contract.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use quarry_query::{
    ConnectionDescriptor, DatabaseConfig, DatabaseError, DatabaseResult, Driver, FieldInfo,
    ResultSet, Row, Value,
};
use regex_lite::Regex;
use tokio_rusqlite::Connection;
use tracing::{debug, info, instrument, trace};

use crate::config::SqliteConfig;
use crate::error::{SqliteError, SqliteResult};
use crate::functions;
use crate::types::get_value_at_index;

/// Engine type served by this driver.
pub const ENGINE: &str = "sqlite";

static WRITE_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:INSERT|UPDATE|REPLACE|SET|DELETE)\b").expect("valid write pattern")
});

static INSERT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:INSERT|REPLACE)\b").expect("valid insert pattern")
});

/// Connections shared by drivers opened with `persistent = true`, keyed by path.
static PERSISTENT: LazyLock<Mutex<HashMap<String, Connection>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Whether a statement may modify data and must bypass the result cache.
pub fn is_write_statement(sql: &str) -> bool {
    WRITE_STATEMENT.is_match(sql)
}

/// SQLite driver.
pub struct SqliteDriver {
    config: SqliteConfig,
    conn: Option<Connection>,
    cache: Mutex<HashMap<String, ResultSet>>,
}

impl std::fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDriver")
            .field("config", &self.config)
            .field("connected", &self.conn.is_some())
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

impl SqliteDriver {
    /// Create an unconnected driver.
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            conn: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Create a driver from generic settings and a parsed DSN.
    pub fn from_descriptor(
        config: &DatabaseConfig,
        descriptor: &ConnectionDescriptor,
    ) -> SqliteResult<Self> {
        Ok(Self::new(SqliteConfig::from_database_config(config, descriptor)?))
    }

    /// The driver configuration.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Number of cached result sets.
    pub fn cached_statements(&self) -> usize {
        self.cache.lock().len()
    }

    fn conn(&self) -> SqliteResult<&Connection> {
        self.conn.as_ref().ok_or(SqliteError::NotConnected)
    }

    async fn open(config: &SqliteConfig) -> SqliteResult<Connection> {
        let path = config.path.as_str();
        let conn = if config.path.is_memory() {
            Connection::open_in_memory().await
        } else {
            Connection::open(&path).await
        }
        .map_err(|e| SqliteError::connection(format!("{}: {}", path, e)))?;

        let init_sql = config.init_sql();
        conn.call(move |conn| {
            conn.execute_batch(&init_sql)?;
            functions::register_regexp(conn)?;
            Ok(())
        })
        .await
        .map_err(|e| SqliteError::connection(format!("{}: {}", path, e)))?;

        Ok(conn)
    }

    async fn run(&self, sql: &str) -> SqliteResult<ResultSet> {
        let sql = sql.to_string();
        let conn = self.conn()?;

        let result = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;

                if stmt.column_count() > 0 {
                    let columns: Vec<String> =
                        stmt.column_names().iter().map(|s| s.to_string()).collect();
                    let mut rows = stmt.query([])?;
                    let mut out = Vec::new();
                    while let Some(row) = rows.next()? {
                        let mut record = Row::with_capacity(columns.len());
                        for (i, column) in columns.iter().enumerate() {
                            record.insert(column.clone(), get_value_at_index(row, i));
                        }
                        out.push(record);
                    }
                    return Ok(ResultSet::from_rows(columns, out));
                }

                let affected = stmt.execute([])? as u64;
                let insert_id =
                    INSERT_STATEMENT.is_match(&sql).then(|| conn.last_insert_rowid());
                Ok(ResultSet::affected(affected, insert_id))
            })
            .await?;

        Ok(result)
    }

    async fn read_strings(&self, sql: &str, column: &str) -> DatabaseResult<Vec<String>> {
        let result = self.run(sql).await.map_err(|e| DatabaseError::from(e).with_sql(sql))?;
        Ok(result
            .column(column)
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }
}

/// Driver factory for the registry.
pub fn factory(
    config: &DatabaseConfig,
    descriptor: ConnectionDescriptor,
) -> DatabaseResult<Box<dyn Driver>> {
    Ok(Box::new(SqliteDriver::from_descriptor(config, &descriptor)?))
}

#[async_trait]
impl Driver for SqliteDriver {
    fn engine(&self) -> &str {
        ENGINE
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    #[instrument(skip(self), fields(path = %self.config.path.as_str()))]
    async fn connect(&mut self) -> DatabaseResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let key = self.config.path.as_str();
        if self.config.persistent {
            let shared = PERSISTENT.lock().get(&key).cloned();
            if let Some(conn) = shared {
                debug!("Reusing persistent SQLite connection");
                self.conn = Some(conn);
                return Ok(());
            }
        }

        let conn = Self::open(&self.config).await?;
        if self.config.persistent {
            PERSISTENT.lock().entry(key).or_insert_with(|| conn.clone());
        }

        info!(persistent = self.config.persistent, "SQLite connection opened");
        self.conn = Some(conn);
        Ok(())
    }

    fn limit_clause(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        match (limit, offset) {
            (Some(limit), Some(offset)) => Some(format!("LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => Some(format!("LIMIT {limit}")),
            (None, Some(offset)) => Some(format!("LIMIT -1 OFFSET {offset}")),
            (None, None) => None,
        }
    }

    fn compile_merge(&self, table: &str, set: &IndexMap<String, String>) -> String {
        let columns = set
            .keys()
            .map(|column| self.escape_column(column))
            .collect::<Vec<_>>()
            .join(", ");
        let values = set.values().cloned().collect::<Vec<_>>().join(", ");
        format!("INSERT OR REPLACE INTO {table} ({columns}) VALUES ({values})")
    }

    #[instrument(skip(self), level = "debug")]
    async fn execute(&self, sql: &str) -> DatabaseResult<ResultSet> {
        let cacheable = self.config.cache && !is_write_statement(sql);
        if cacheable {
            if let Some(hit) = self.cache.lock().get(sql).cloned() {
                trace!("Result cache hit");
                return Ok(hit);
            }
        }

        let result = self.run(sql).await?;

        if cacheable && !result.columns().is_empty() {
            self.cache.lock().insert(sql.to_string(), result.clone());
        }
        Ok(result)
    }

    async fn list_tables(&self) -> DatabaseResult<Vec<String>> {
        self.read_strings(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' ORDER BY name",
            "name",
        )
        .await
    }

    async fn field_data(&self, table: &str) -> DatabaseResult<Vec<FieldInfo>> {
        let sql = format!("PRAGMA table_info({})", self.escape_table(table));
        let result = self
            .run(&sql)
            .await
            .map_err(|e| DatabaseError::from(e).with_sql(&sql))?;

        Ok(result
            .rows()
            .iter()
            .map(|row| FieldInfo {
                name: row.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
                data_type: row.get("type").and_then(Value::as_str).unwrap_or_default().to_string(),
                nullable: row.get("notnull").and_then(Value::as_i64) == Some(0),
                default: row
                    .get("dflt_value")
                    .filter(|v| !v.is_null())
                    .map(Value::to_raw_sql),
                primary_key: row.get("pk").and_then(Value::as_i64).unwrap_or(0) > 0,
            })
            .collect())
    }

    fn clear_cache(&self, sql: Option<&str>) {
        let mut cache = self.cache.lock();
        match sql {
            Some(sql) => {
                cache.remove(sql);
            }
            None => cache.clear(),
        }
    }
}
