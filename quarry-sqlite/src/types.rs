//! Type conversion utilities for SQLite.

use quarry_query::Value;
use rusqlite::types::ValueRef;

/// Convert a SQLite value into a [`Value`].
pub fn from_sqlite_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

/// Read the value at a column index, yielding NULL for an invalid index.
pub fn get_value_at_index(row: &rusqlite::Row<'_>, index: usize) -> Value {
    row.get_ref(index)
        .map(from_sqlite_value)
        .unwrap_or(Value::Null)
}

/// Render a SQLite value as text, for functions that compare strings.
pub fn value_as_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
