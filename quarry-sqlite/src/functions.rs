//! SQL functions registered on every connection.

use std::sync::Arc;

use regex_lite::Regex;
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;

use crate::types::value_as_text;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Register `regexp(pattern, text)`, which backs `text REGEXP pattern`.
///
/// Compiled patterns are cached per statement. A NULL text yields NULL.
pub fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: Arc<Regex> = ctx.get_or_create_aux(0, |pattern| -> Result<_, BoxError> {
                Ok(Regex::new(pattern.as_str()?)?)
            })?;

            Ok(value_as_text(ctx.get_raw(1)).map(|text| regex.is_match(&text)))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(conn: &Connection, sql: &str) -> Option<bool> {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_regexp_operator() {
        let conn = Connection::open_in_memory().unwrap();
        register_regexp(&conn).unwrap();

        assert_eq!(eval(&conn, "SELECT 'abc123' REGEXP '^[a-z]+[0-9]+$'"), Some(true));
        assert_eq!(eval(&conn, "SELECT 'abc' REGEXP '^[0-9]+$'"), Some(false));
        assert_eq!(eval(&conn, "SELECT 'abc' NOT REGEXP '^[0-9]+$'"), Some(true));
        assert_eq!(eval(&conn, "SELECT 42 REGEXP '^4'"), Some(true));
        assert_eq!(eval(&conn, "SELECT NULL REGEXP 'a'"), None);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        register_regexp(&conn).unwrap();
        let result: rusqlite::Result<Option<bool>> =
            conn.query_row("SELECT 'a' REGEXP '('", [], |row| row.get(0));
        assert!(result.is_err());
    }
}
