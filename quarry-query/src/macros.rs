//! Convenience macros.

/// Build a list of bind values from expressions of mixed types.
///
/// ```rust
/// use quarry_query::{Value, binds};
///
/// let values = binds![1, "ada", None::<i64>, true];
/// assert_eq!(values[1], Value::from("ada"));
/// assert_eq!(values[2], Value::Null);
/// ```
#[macro_export]
macro_rules! binds {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}
