//! Fuzz target for connection string parsing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_dsn_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry_query::ConnectionDescriptor;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Errors are fine, panics are not.
    let Ok(descriptor) = ConnectionDescriptor::parse(input) else {
        return;
    };

    assert!(descriptor.host.is_none() || descriptor.socket.is_none());

    let rendered = descriptor.to_string();
    assert!(rendered.starts_with(&descriptor.engine_type));
});
