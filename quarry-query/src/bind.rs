//! Positional parameter substitution.
//!
//! [`bind`] replaces `?` markers in a SQL template with escaped values, left
//! to right. Only the unconsumed remainder of the template is ever searched
//! for markers, so a `?` inside a substituted value can never be taken for a
//! marker. Surplus values are ignored and surplus markers are left as they
//! are.
//!
//! ```rust
//! use quarry_query::{Value, bind::bind, sql::escape_value};
//!
//! let sql = bind("WHERE a = ? AND b = ?", &[Value::Int(1), Value::from("x")], escape_value);
//! assert_eq!(sql, "WHERE a = 1 AND b = 'x'");
//! ```

use crate::value::Value;

/// The positional marker.
pub const MARKER: char = '?';

/// Substitute `values` into `template` using `escape` to render each value.
pub fn bind<F>(template: &str, values: &[Value], escape: F) -> String
where
    F: Fn(&Value) -> String,
{
    let mut out = String::with_capacity(template.len() + values.len() * 8);
    let mut rest = template;

    for value in values {
        let Some(idx) = rest.find(MARKER) else {
            break;
        };
        out.push_str(&rest[..idx]);
        out.push_str(&escape(value));
        rest = &rest[idx + MARKER.len_utf8()..];
    }

    out.push_str(rest);
    out
}

/// Number of markers in a template.
pub fn marker_count(template: &str) -> usize {
    template.matches(MARKER).count()
}
