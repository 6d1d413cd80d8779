//! Fuzz target for `?` substitution.
//!
//! Checks that markers inside substituted values are never consumed and
//! that exactly `min(markers, values)` markers are replaced.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_bind
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use quarry_query::Value;
use quarry_query::bind::{bind, marker_count};
use quarry_query::sql::escape_value;

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<FuzzValue> for Value {
    fn from(value: FuzzValue) -> Self {
        match value {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::Bool(b),
            FuzzValue::Int(i) => Value::Int(i),
            FuzzValue::Float(f) => Value::Float(f),
            FuzzValue::Text(s) => Value::String(s),
            FuzzValue::Blob(b) => Value::Blob(b),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct BindInput {
    template: String,
    values: Vec<FuzzValue>,
}

fuzz_target!(|input: BindInput| {
    let markers = marker_count(&input.template);
    let values: Vec<Value> = input.values.into_iter().map(Value::from).collect();

    let escaped_markers: usize = values
        .iter()
        .take(markers)
        .map(|value| marker_count(&escape_value(value)))
        .sum();

    let output = bind(&input.template, &values, escape_value);

    let replaced = markers.min(values.len());
    assert_eq!(marker_count(&output), markers - replaced + escaped_markers);
});
