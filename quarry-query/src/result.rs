//! Result sets returned by drivers.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::DatabaseResult;
use crate::value::Value;

/// One result row, column name to value, in column order.
pub type Row = IndexMap<String, Value>;

/// How rows are presented by [`ResultSet::to_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Rows as records keyed by column name.
    #[default]
    Object,
    /// Rows as positional arrays.
    Array,
}

impl FetchMode {
    /// Mode for the `object` configuration flag.
    pub fn from_object_flag(object: bool) -> Self {
        if object { Self::Object } else { Self::Array }
    }
}

/// The outcome of executing one statement.
///
/// Iterating consumes rows from the cursor onward; call [`rewind`](Self::rewind)
/// to iterate again.
///
/// ```rust
/// use quarry_query::{ResultSet, Row, Value};
///
/// let mut row = Row::new();
/// row.insert("id".into(), Value::Int(1));
/// let mut result = ResultSet::from_rows(vec!["id".into()], vec![row]);
///
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.by_ref().count(), 1);
/// assert!(result.next().is_none());
///
/// result.rewind();
/// assert!(result.next().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
    cursor: usize,
    total_rows: u64,
    insert_id: Option<i64>,
    fetch_mode: FetchMode,
}

impl ResultSet {
    /// A result of a statement that returned rows.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let total_rows = rows.len() as u64;
        Self {
            columns,
            rows,
            total_rows,
            ..Self::default()
        }
    }

    /// A result of a write statement.
    pub fn affected(affected_rows: u64, insert_id: Option<i64>) -> Self {
        Self {
            total_rows: affected_rows,
            insert_id,
            ..Self::default()
        }
    }

    /// Set the presentation mode.
    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    /// Presentation mode.
    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows regardless of the cursor.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows returned by a read, or rows affected by a write.
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Row id generated by an insert, if any.
    pub fn insert_id(&self) -> Option<i64> {
        self.insert_id
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are held.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row under the cursor.
    pub fn current(&self) -> Option<&Row> {
        self.rows.get(self.cursor)
    }

    /// Move the cursor. Returns `false` (leaving the cursor alone) when out of range.
    pub fn seek(&mut self, index: usize) -> bool {
        if index < self.rows.len() {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    /// Move the cursor back to the first row.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Row at `index`.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// All values of one column.
    pub fn column(&self, name: &str) -> Vec<&Value> {
        self.rows.iter().filter_map(|row| row.get(name)).collect()
    }

    /// Export rows as JSON, as objects or arrays depending on the fetch mode.
    pub fn to_json(&self) -> JsonValue {
        let rows = self.rows.iter().map(|row| match self.fetch_mode {
            FetchMode::Object => JsonValue::Object(
                row.iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            FetchMode::Array => JsonValue::Array(row.values().map(Value::to_json).collect()),
        });
        JsonValue::Array(rows.collect())
    }

    /// Decode every row into `T`.
    pub fn records<T: DeserializeOwned>(&self) -> DatabaseResult<Vec<T>> {
        self.rows
            .iter()
            .map(|row| {
                let object = row
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect();
                serde_json::from_value(JsonValue::Object(object)).map_err(Into::into)
            })
            .collect()
    }
}

impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.len().saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}
