//! The driver capability contract.
//!
//! A [`Driver`] adapts one database engine: it connects, escapes values and
//! identifiers, compiles clause fragments and full statements from
//! [`BuilderState`], executes SQL and reports table metadata.
//!
//! Most compilation methods have ANSI default implementations. A driver only
//! overrides what its dialect does differently, usually
//! [`quote_char`](Driver::quote_char), [`limit_clause`](Driver::limit_clause)
//! and [`compile_merge`](Driver::compile_merge).

use std::sync::LazyLock;

use async_trait::async_trait;
use indexmap::IndexMap;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::clause::{Condition, Connective, Quote};
use crate::error::DatabaseResult;
use crate::result::ResultSet;
use crate::sql;
use crate::state::{BuilderState, Predicate};
use crate::value::Value;

static HAS_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[<>!=]|\sIS(?:\s+NOT)?\s*$").expect("valid operator pattern")
});

static OPERATOR_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s*([<>!=]+|\bIS(?:\s+NOT)?)\s*$").expect("valid operator split pattern")
});

/// Description of one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Column name.
    pub name: String,
    /// Declared type, as reported by the engine.
    pub data_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default value expression.
    pub default: Option<String>,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

/// Whether a predicate key already carries a comparison operator.
pub fn has_operator(key: &str) -> bool {
    HAS_OPERATOR.is_match(key.trim_end())
}

/// Split `"age >="` into `("age", Some(">="))`.
pub fn split_operator(key: &str) -> (&str, Option<String>) {
    match OPERATOR_SPLIT.captures(key) {
        Some(caps) if has_operator(key) => {
            let column = caps.get(1).map_or(key, |m| m.as_str().trim());
            let operator = caps.get(2).map(|m| {
                m.as_str()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_uppercase()
            });
            (column, operator)
        }
        _ => (key.trim(), None),
    }
}

/// Wrap a `LIKE` pattern in `%` unless it already starts or ends with one.
pub fn like_pattern(pattern: &str) -> String {
    if pattern.starts_with('%') || pattern.ends_with('%') {
        pattern.to_string()
    } else {
        format!("%{}%", pattern)
    }
}

/// Capability contract every database engine adapter implements.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Engine type this driver serves (lower case, e.g. `sqlite`).
    fn engine(&self) -> &str;

    /// Whether [`connect`](Driver::connect) has succeeded.
    fn is_connected(&self) -> bool;

    /// Open the connection.
    async fn connect(&mut self) -> DatabaseResult<()>;

    /// Identifier quote character of the dialect.
    fn quote_char(&self) -> char {
        sql::ANSI_QUOTE
    }

    /// Render a value as a literal.
    fn escape(&self, value: &Value) -> String {
        sql::escape_value(value)
    }

    /// Escape text for use inside a single-quoted literal, without the quotes.
    fn escape_str(&self, text: &str) -> String {
        sql::escape_str(text)
    }

    /// Quote a column reference. Idempotent.
    fn escape_column(&self, column: &str) -> String {
        sql::quote_column(column, self.quote_char())
    }

    /// Quote a table reference. Idempotent.
    fn escape_table(&self, table: &str) -> String {
        sql::quote_column(table, self.quote_char())
    }

    /// Compile one `WHERE` fragment.
    fn compile_where(&self, condition: &Condition, connective: Connective, position: usize) -> String {
        let prefix = connective.prefix_at(position);
        let key = condition.key.trim();

        let Some(value) = condition.value.as_ref() else {
            return format!("{prefix}{key}");
        };

        if condition.quote == Quote::Raw {
            return format!("{prefix}{key} {}", value.to_raw_sql());
        }

        let (column, operator) = split_operator(key);
        let column = self.escape_column(column);

        let body = match value {
            Value::Null => {
                let test = match operator.as_deref() {
                    None | Some("=") | Some("IS") => "IS NULL",
                    Some("!=") | Some("<>") | Some("IS NOT") => "IS NOT NULL",
                    Some(op) => return format!("{prefix}{column} {op} NULL"),
                };
                format!("{column} {test}")
            }
            Value::Bool(b) => {
                let op = operator.as_deref().unwrap_or("=");
                format!("{column} {op} {}", if *b { 1 } else { 0 })
            }
            other => {
                let op = operator.as_deref().unwrap_or("=");
                format!("{column} {op} {}", self.escape(other))
            }
        };

        format!("{prefix}{body}")
    }

    /// Compile one `HAVING` fragment.
    fn compile_having(&self, condition: &Condition, connective: Connective, position: usize) -> String {
        self.compile_where(condition, connective, position)
    }

    /// Compile one `LIKE` fragment.
    fn compile_like(&self, condition: &Condition, connective: Connective, position: usize) -> String {
        compile_pattern(self, condition, "LIKE", true, connective, position)
    }

    /// Compile one `NOT LIKE` fragment.
    fn compile_not_like(&self, condition: &Condition, connective: Connective, position: usize) -> String {
        compile_pattern(self, condition, "NOT LIKE", true, connective, position)
    }

    /// Compile one `REGEXP` fragment.
    fn compile_regex(&self, condition: &Condition, connective: Connective, position: usize) -> String {
        compile_pattern(self, condition, "REGEXP", false, connective, position)
    }

    /// Compile one `NOT REGEXP` fragment.
    fn compile_not_regex(&self, condition: &Condition, connective: Connective, position: usize) -> String {
        compile_pattern(self, condition, "NOT REGEXP", false, connective, position)
    }

    /// Trailing `LIMIT`/`OFFSET` clause, if any.
    fn limit_clause(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        match (limit, offset) {
            (Some(limit), Some(offset)) => Some(format!("LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => Some(format!("LIMIT {limit}")),
            (None, Some(offset)) => Some(format!("OFFSET {offset}")),
            (None, None) => None,
        }
    }

    /// Compile a complete `SELECT` statement.
    fn compile_select(&self, state: &BuilderState) -> String {
        let mut sql = String::from("SELECT ");
        if state.distinct {
            sql.push_str("DISTINCT ");
        }

        if state.select.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&state.select.join(", "));
        }

        if !state.from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&state.from.join(", "));
        }

        for join in &state.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        push_predicates(&mut sql, " WHERE ", &state.predicates);

        if !state.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&state.group_by.iter().cloned().collect::<Vec<_>>().join(", "));
        }

        push_predicates(&mut sql, " HAVING ", &state.having);

        if !state.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&state.order_by.join(", "));
        }

        if let Some(clause) = self.limit_clause(state.limit, state.offset) {
            sql.push(' ');
            sql.push_str(&clause);
        }

        sql
    }

    /// Compile an `INSERT` statement. `set` values are already escaped.
    fn compile_insert(&self, table: &str, set: &IndexMap<String, String>) -> String {
        let (columns, values) = columns_and_values(self, set);
        format!("INSERT INTO {table} ({columns}) VALUES ({values})")
    }

    /// Compile an insert-or-replace statement. `set` values are already escaped.
    fn compile_merge(&self, table: &str, set: &IndexMap<String, String>) -> String {
        let (columns, values) = columns_and_values(self, set);
        format!("REPLACE INTO {table} ({columns}) VALUES ({values})")
    }

    /// Compile an `UPDATE` statement. `set` values are already escaped.
    fn compile_update(
        &self,
        table: &str,
        set: &IndexMap<String, String>,
        predicates: &[Predicate],
    ) -> String {
        let assignments = set
            .iter()
            .map(|(column, value)| format!("{} = {}", self.escape_column(column), value))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {table} SET {assignments}");
        push_predicates(&mut sql, " WHERE ", predicates);
        sql
    }

    /// Compile a `DELETE` statement.
    fn compile_delete(&self, table: &str, predicates: &[Predicate]) -> String {
        let mut sql = format!("DELETE FROM {table}");
        push_predicates(&mut sql, " WHERE ", predicates);
        sql
    }

    /// Execute a statement.
    async fn execute(&self, sql: &str) -> DatabaseResult<ResultSet>;

    /// Names of all tables.
    async fn list_tables(&self) -> DatabaseResult<Vec<String>>;

    /// Column descriptions of a table.
    async fn field_data(&self, table: &str) -> DatabaseResult<Vec<FieldInfo>>;

    /// Column names of a table.
    async fn list_fields(&self, table: &str) -> DatabaseResult<Vec<String>> {
        Ok(self
            .field_data(table)
            .await?
            .into_iter()
            .map(|field| field.name)
            .collect())
    }

    /// Drop the cached result of one statement, or of all statements when `sql` is `None`.
    fn clear_cache(&self, _sql: Option<&str>) {}
}

fn compile_pattern<D: Driver + ?Sized>(
    driver: &D,
    condition: &Condition,
    keyword: &str,
    wrap: bool,
    connective: Connective,
    position: usize,
) -> String {
    let prefix = connective.prefix_at(position);
    let pattern = condition.pattern();

    if condition.quote == Quote::Raw && condition.value.is_some() {
        return format!("{prefix}{} {keyword} {pattern}", condition.key.trim());
    }

    let pattern = if wrap { like_pattern(&pattern) } else { pattern };
    format!(
        "{prefix}{} {keyword} '{}'",
        driver.escape_column(&condition.key),
        driver.escape_str(&pattern)
    )
}

fn columns_and_values<D: Driver + ?Sized>(
    driver: &D,
    set: &IndexMap<String, String>,
) -> (String, String) {
    let columns = set
        .keys()
        .map(|column| driver.escape_column(column))
        .collect::<Vec<_>>()
        .join(", ");
    let values = set.values().cloned().collect::<Vec<_>>().join(", ");
    (columns, values)
}

fn push_predicates(sql: &mut String, keyword: &str, predicates: &[Predicate]) {
    if predicates.is_empty() {
        return;
    }
    sql.push_str(keyword);
    sql.push_str(
        &predicates
            .iter()
            .map(|p| p.sql.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    );
}
