//! SQL text utilities shared by drivers.
//!
//! These helpers implement the ANSI flavour of identifier quoting and literal
//! escaping. Drivers with a different dialect call the `_with` variants or
//! override the corresponding [`Driver`](crate::Driver) methods.

use crate::value::Value;

/// ANSI identifier quote character.
pub const ANSI_QUOTE: char = '"';

const RESERVED: &[&str] = &[
    "user", "order", "group", "select", "from", "where", "table", "index", "key", "primary",
    "foreign", "check", "default", "null", "not", "and", "or", "in", "is", "like", "between",
    "case", "when", "then", "else", "end", "as", "on", "join", "left", "right", "inner", "outer",
    "cross", "natural", "using", "limit", "offset", "union", "intersect", "except", "all",
    "distinct", "having", "create", "alter", "drop", "insert", "update", "delete", "into",
    "values", "set", "returning", "regexp", "replace",
];

/// Check if an identifier needs quoting.
pub fn needs_quoting(name: &str) -> bool {
    if RESERVED.contains(&name.to_lowercase().as_str()) {
        return true;
    }

    name.starts_with(|c: char| c.is_ascii_digit())
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` is already wrapped in `quote` characters.
pub fn is_quoted(name: &str, quote: char) -> bool {
    name.len() >= 2 && name.starts_with(quote) && name.ends_with(quote)
}

/// Wrap an identifier in `quote`, doubling embedded quote characters.
pub fn escape_identifier_with(name: &str, quote: char) -> String {
    let doubled = quote.to_string().repeat(2);
    let escaped = name.replace(quote, &doubled);
    format!("{quote}{escaped}{quote}")
}

/// Quote a single identifier segment with ANSI double quotes if needed.
pub fn quote_identifier(name: &str) -> String {
    quote_identifier_with(name, ANSI_QUOTE)
}

/// Quote a single identifier segment if needed.
///
/// Segments that are already quoted, empty, or `*` are returned unchanged.
pub fn quote_identifier_with(name: &str, quote: char) -> String {
    if name.is_empty() || name == "*" || is_quoted(name, quote) || !needs_quoting(name) {
        name.to_string()
    } else {
        escape_identifier_with(name, quote)
    }
}

/// Quote a possibly qualified column or table reference.
///
/// Handles `schema.table.column` paths segment by segment, `table.*`, and
/// `expr AS alias`. Expressions containing a parenthesis are left untouched.
/// Applying this twice yields the same text as applying it once.
///
/// ```rust
/// use quarry_query::sql::quote_column;
///
/// assert_eq!(quote_column("users.name", '"'), "users.name");
/// assert_eq!(quote_column("order.user", '"'), "\"order\".\"user\"");
/// assert_eq!(quote_column("u.email AS contact", '"'), "u.email AS contact");
/// assert_eq!(quote_column("COUNT(*)", '"'), "COUNT(*)");
/// ```
pub fn quote_column(name: &str, quote: char) -> String {
    let name = name.trim();
    if name.is_empty() || name.contains('(') {
        return name.to_string();
    }

    if let Some((expr, alias)) = split_alias(name) {
        return format!(
            "{} AS {}",
            quote_column(expr, quote),
            quote_identifier_with(alias.trim(), quote)
        );
    }

    split_path(name, quote)
        .iter()
        .map(|segment| quote_identifier_with(segment, quote))
        .collect::<Vec<_>>()
        .join(".")
}

/// Split `expr AS alias` on the last case-insensitive ` AS ` keyword.
fn split_alias(name: &str) -> Option<(&str, &str)> {
    let upper = name.to_ascii_uppercase();
    let idx = upper.rfind(" AS ")?;
    Some((&name[..idx], &name[idx + 4..]))
}

/// Split a dotted path, keeping dots inside quoted segments.
fn split_path(name: &str, quote: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in name.chars() {
        if c == quote {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c == '.' && !in_quotes {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    segments.push(current);
    segments
}

/// Escape text for use inside a single-quoted literal.
pub fn escape_str(text: &str) -> String {
    text.replace('\'', "''")
}

/// Render a value as an ANSI SQL literal.
///
/// ```rust
/// use quarry_query::{Value, sql::escape_value};
///
/// assert_eq!(escape_value(&Value::Null), "NULL");
/// assert_eq!(escape_value(&Value::Bool(true)), "1");
/// assert_eq!(escape_value(&Value::from("O'Brien")), "'O''Brien'");
/// ```
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(_) => "NULL".to_string(),
        Value::String(s) => format!("'{}'", escape_str(s)),
        Value::Blob(bytes) => hex_literal(bytes),
    }
}

/// Render bytes as an `X'..'` literal.
pub fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for b in bytes {
        out.push_str(&format!("{:02X}", b));
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting("user"));
        assert!(needs_quoting("ORDER"));
        assert!(needs_quoting("first name"));
        assert!(needs_quoting("2fa"));
        assert!(!needs_quoting("email"));
        assert!(!needs_quoting("created_at"));
    }

    #[test]
    fn test_quote_identifier_idempotent() {
        for name in ["t", "user", "my table", "we\"ird"] {
            let once = quote_identifier(name);
            assert_eq!(quote_identifier(&once), once, "for {name}");
        }
        assert_eq!(quote_identifier("user"), "\"user\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quote_column_paths() {
        assert_eq!(quote_column("users.*", '"'), "users.*");
        assert_eq!(quote_column("*", '"'), "*");
        assert_eq!(quote_column("select.from", '`'), "`select`.`from`");
        assert_eq!(quote_column("\"my.table\".id", '"'), "\"my.table\".id");
        assert_eq!(quote_column("  name ", '"'), "name");
    }

    #[test]
    fn test_quote_column_alias() {
        assert_eq!(quote_column("name as order", '"'), "name AS \"order\"");
        let once = quote_column("group.key AS user", '"');
        assert_eq!(once, "\"group\".\"key\" AS \"user\"");
        assert_eq!(quote_column(&once, '"'), once);
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value(&Value::Int(-4)), "-4");
        assert_eq!(escape_value(&Value::Float(2.5)), "2.5");
        assert_eq!(escape_value(&Value::Float(f64::INFINITY)), "NULL");
        assert_eq!(escape_value(&Value::Blob(vec![0xde, 0xad])), "X'DEAD'");
        assert_eq!(escape_value(&Value::from("a?b")), "'a?b'");
    }
}
