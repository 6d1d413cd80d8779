//! In-memory driver used by unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::DatabaseConfig;
use crate::connection::ConnectionDescriptor;
use crate::driver::{Driver, FieldInfo};
use crate::error::{DatabaseError, DatabaseResult};
use crate::result::{ResultSet, Row};
use crate::value::Value;

/// Records executed statements and replays queued responses.
#[derive(Debug, Clone)]
pub(crate) struct MockDriver {
    engine: String,
    connected: bool,
    pub connects: Arc<AtomicUsize>,
    pub executed: Arc<Mutex<Vec<String>>>,
    pub cleared: Arc<Mutex<Vec<Option<String>>>>,
    responses: Arc<Mutex<VecDeque<DatabaseResult<ResultSet>>>>,
    fail_connect: bool,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::with_engine("mock")
    }

    pub fn with_engine(engine: &str) -> Self {
        Self {
            engine: engine.to_string(),
            connected: false,
            connects: Arc::new(AtomicUsize::new(0)),
            executed: Arc::new(Mutex::new(Vec::new())),
            cleared: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fail_connect: false,
        }
    }

    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn respond(&self, response: DatabaseResult<ResultSet>) {
        self.responses.lock().push_back(response);
    }

    pub fn respond_count(&self, count: i64) {
        let mut row = Row::new();
        row.insert("records_found".into(), Value::Int(count));
        self.respond(Ok(ResultSet::from_rows(vec!["records_found".into()], vec![row])));
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }

    pub fn last_executed(&self) -> Option<String> {
        self.executed.lock().last().cloned()
    }

    pub fn factory(
        _config: &DatabaseConfig,
        _descriptor: ConnectionDescriptor,
    ) -> DatabaseResult<Box<dyn Driver>> {
        Ok(Box::new(MockDriver::new()))
    }

    pub fn lying_factory(
        _config: &DatabaseConfig,
        _descriptor: ConnectionDescriptor,
    ) -> DatabaseResult<Box<dyn Driver>> {
        Ok(Box::new(MockDriver::with_engine("somethingelse")))
    }
}

#[async_trait]
impl Driver for MockDriver {
    fn engine(&self) -> &str {
        &self.engine
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> DatabaseResult<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(DatabaseError::connection("access denied for user"));
        }
        self.connected = true;
        Ok(())
    }

    async fn execute(&self, sql: &str) -> DatabaseResult<ResultSet> {
        self.executed.lock().push(sql.to_string());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ResultSet::affected(0, None)))
    }

    async fn list_tables(&self) -> DatabaseResult<Vec<String>> {
        Ok(vec!["app_users".into(), "app_posts".into()])
    }

    async fn field_data(&self, table: &str) -> DatabaseResult<Vec<FieldInfo>> {
        Ok(vec![FieldInfo {
            name: format!("{table}_id"),
            data_type: "INTEGER".into(),
            nullable: false,
            default: None,
            primary_key: true,
        }])
    }

    fn clear_cache(&self, sql: Option<&str>) {
        self.cleared.lock().push(sql.map(str::to_string));
    }
}
