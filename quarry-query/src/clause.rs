//! Clause inputs accepted by the fluent builder.
//!
//! Predicates are passed through [`IntoConditions`], which accepts several
//! call shapes:
//!
//! ```rust
//! use quarry_query::{Condition, IntoConditions, Quote};
//!
//! // A quoted key/value pair.
//! let c = ("id", 5).into_conditions();
//! assert_eq!(c[0].quote, Quote::Quoted);
//!
//! // A bare expression is trusted SQL and never escaped.
//! let c = "a.id = b.a_id".into_conditions();
//! assert_eq!(c[0].quote, Quote::Raw);
//! assert!(c[0].value.is_none());
//!
//! // Explicit mode wins over the call shape.
//! let c = ("total >", "price * 2", Quote::Raw).into_conditions();
//! assert_eq!(c[0].quote, Quote::Raw);
//!
//! // Many pairs at once.
//! let c = [("status", "active"), ("role", "admin")].into_conditions();
//! assert_eq!(c.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// How a predicate value is rendered into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    /// Escape the value through the driver.
    #[default]
    Quoted,
    /// Emit the value verbatim; the caller vouches for it.
    Raw,
}

/// Boolean connective placed before every predicate but the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Connective {
    /// The keyword followed by a single space.
    pub fn as_prefix(&self) -> &'static str {
        match self {
            Self::And => "AND ",
            Self::Or => "OR ",
        }
    }

    /// The prefix to emit for a fragment recorded at `position`.
    pub fn prefix_at(&self, position: usize) -> &'static str {
        if position == 0 { "" } else { self.as_prefix() }
    }
}

/// One predicate input: a key (column, optionally with operator) and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Column name, optionally followed by an operator (`age >`), or a
    /// complete expression when `value` is `None`.
    pub key: String,
    /// Value to compare against; `None` for a bare expression.
    pub value: Option<Value>,
    /// Rendering mode of the value.
    pub quote: Quote,
}

impl Condition {
    /// A quoted key/value predicate.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            quote: Quote::Quoted,
        }
    }

    /// A key/value predicate with explicit rendering mode.
    pub fn with_quote(key: impl Into<String>, value: impl Into<Value>, quote: Quote) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            quote,
        }
    }

    /// A trusted SQL expression emitted as-is.
    pub fn raw(expression: impl Into<String>) -> Self {
        Self {
            key: expression.into(),
            value: None,
            quote: Quote::Raw,
        }
    }

    /// Text of the value for pattern predicates (`LIKE`, `REGEXP`).
    pub fn pattern(&self) -> String {
        self.value.as_ref().map(Value::to_raw_sql).unwrap_or_default()
    }
}

/// Conversion into a list of predicate inputs.
pub trait IntoConditions {
    /// Convert into conditions, in order.
    fn into_conditions(self) -> Vec<Condition>;
}

impl IntoConditions for Condition {
    fn into_conditions(self) -> Vec<Condition> {
        vec![self]
    }
}

impl IntoConditions for Vec<Condition> {
    fn into_conditions(self) -> Vec<Condition> {
        self
    }
}

impl IntoConditions for &str {
    fn into_conditions(self) -> Vec<Condition> {
        vec![Condition::raw(self)]
    }
}

impl IntoConditions for String {
    fn into_conditions(self) -> Vec<Condition> {
        vec![Condition::raw(self)]
    }
}

impl<K: Into<String>, V: Into<Value>> IntoConditions for (K, V) {
    fn into_conditions(self) -> Vec<Condition> {
        vec![Condition::new(self.0, self.1)]
    }
}

impl<K: Into<String>, V: Into<Value>> IntoConditions for (K, V, Quote) {
    fn into_conditions(self) -> Vec<Condition> {
        vec![Condition::with_quote(self.0, self.1, self.2)]
    }
}

impl<K: Into<String>, V: Into<Value>> IntoConditions for Vec<(K, V)> {
    fn into_conditions(self) -> Vec<Condition> {
        self.into_iter().map(|(k, v)| Condition::new(k, v)).collect()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> IntoConditions for [(K, V); N] {
    fn into_conditions(self) -> Vec<Condition> {
        self.into_iter().map(|(k, v)| Condition::new(k, v)).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> IntoConditions for IndexMap<K, V> {
    fn into_conditions(self) -> Vec<Condition> {
        self.into_iter().map(|(k, v)| Condition::new(k, v)).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> IntoConditions for BTreeMap<K, V> {
    fn into_conditions(self) -> Vec<Condition> {
        self.into_iter().map(|(k, v)| Condition::new(k, v)).collect()
    }
}

impl<T: IntoConditions> IntoConditions for Option<T> {
    fn into_conditions(self) -> Vec<Condition> {
        self.map(IntoConditions::into_conditions).unwrap_or_default()
    }
}

/// No conditions; used for terminal calls that take no extra predicate.
impl IntoConditions for () {
    fn into_conditions(self) -> Vec<Condition> {
        Vec::new()
    }
}

/// Conversion into ordered column/value pairs for `set`.
pub trait IntoAssignments {
    /// Convert into pairs, in order.
    fn into_assignments(self) -> Vec<(String, Value)>;
}

impl<K: Into<String>, V: Into<Value>> IntoAssignments for (K, V) {
    fn into_assignments(self) -> Vec<(String, Value)> {
        vec![(self.0.into(), self.1.into())]
    }
}

impl<K: Into<String>, V: Into<Value>> IntoAssignments for Vec<(K, V)> {
    fn into_assignments(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> IntoAssignments for [(K, V); N] {
    fn into_assignments(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> IntoAssignments for IndexMap<K, V> {
    fn into_assignments(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> IntoAssignments for BTreeMap<K, V> {
    fn into_assignments(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<T: IntoAssignments> IntoAssignments for Option<T> {
    fn into_assignments(self) -> Vec<(String, Value)> {
        self.map(IntoAssignments::into_assignments).unwrap_or_default()
    }
}

impl IntoAssignments for () {
    fn into_assignments(self) -> Vec<(String, Value)> {
        Vec::new()
    }
}

/// Conversion into a list of column or table names.
///
/// A single string is split on commas, so `"id, name"` yields two entries.
pub trait IntoColumns {
    /// Convert into trimmed, non-empty names.
    fn into_columns(self) -> Vec<String>;
}

fn clean<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        clean(self.split(','))
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        self.as_str().into_columns()
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<String> {
        clean(self.iter())
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        clean(self)
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        clean(self)
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        clean(self)
    }
}

/// Optional table argument of terminal calls.
///
/// Implemented for strings (empty means "none"), `Option<&str>` and `()`.
pub trait IntoTable {
    /// The table name, if one was given.
    fn into_table(self) -> Option<String>;
}

impl IntoTable for &str {
    fn into_table(self) -> Option<String> {
        let table = self.trim();
        (!table.is_empty()).then(|| table.to_string())
    }
}

impl IntoTable for String {
    fn into_table(self) -> Option<String> {
        self.as_str().into_table()
    }
}

impl IntoTable for &String {
    fn into_table(self) -> Option<String> {
        self.as_str().into_table()
    }
}

impl IntoTable for Option<&str> {
    fn into_table(self) -> Option<String> {
        self.and_then(IntoTable::into_table)
    }
}

impl IntoTable for () {
    fn into_table(self) -> Option<String> {
        None
    }
}

/// Join type of a `JOIN` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Plain `JOIN`.
    #[default]
    Default,
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `OUTER JOIN`
    Outer,
    /// `LEFT OUTER JOIN`
    LeftOuter,
    /// `RIGHT OUTER JOIN`
    RightOuter,
}

impl JoinType {
    /// Parse a join type name, case-insensitively. Unknown names fall back to a plain `JOIN`.
    pub fn parse(kind: &str) -> Self {
        let normalized = kind
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        match normalized.as_str() {
            "INNER" => Self::Inner,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "OUTER" => Self::Outer,
            "LEFT OUTER" => Self::LeftOuter,
            "RIGHT OUTER" => Self::RightOuter,
            _ => Self::Default,
        }
    }

    /// The SQL keywords preceding the joined table.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Default => "JOIN",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Outer => "OUTER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Normalise an `ORDER BY` direction.
///
/// Empty input yields no direction. `ASC`, `DESC`, `RAND()`, `RANDOM()` and
/// `NULL` are kept; anything else becomes `ASC`.
pub fn normalize_direction(direction: &str) -> Option<&'static str> {
    let direction = direction.trim().to_uppercase();
    if direction.is_empty() {
        return None;
    }
    Some(match direction.as_str() {
        "DESC" => "DESC",
        "RAND()" => "RAND()",
        "RANDOM()" => "RANDOM()",
        "NULL" => "NULL",
        _ => "ASC",
    })
}
