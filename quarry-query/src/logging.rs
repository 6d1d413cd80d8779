//! Logging bootstrap.
//!
//! Quarry logs through `tracing`. Applications that do not install their own
//! subscriber can call [`init`] (with the `tracing-subscriber` feature) and
//! steer output with environment variables:
//!
//! - `QUARRY_DEBUG=true|1|yes` - debug level logging
//! - `QUARRY_LOG_LEVEL=trace|debug|info|warn|error` - explicit level
//! - `QUARRY_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! ```rust,no_run
//! quarry_query::logging::init();
//! ```
//!
//! Executed statements are logged at `debug` with their SQL, row count and
//! elapsed time; failed statements at `warn`.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Whether `QUARRY_DEBUG` asks for debug logging.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("QUARRY_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Level from `QUARRY_LOG_LEVEL`, falling back to `debug` or `warn`.
pub fn log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("QUARRY_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Format from `QUARRY_LOG_FORMAT`.
pub fn log_format() -> &'static str {
    env::var("QUARRY_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Install a global subscriber once, if logging was requested through the environment.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("QUARRY_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = log_level();
            let filter = EnvFilter::try_new(format!(
                "quarry={level},quarry_query={level},quarry_sqlite={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(log_level = level, format = log_format(), "Quarry logging initialized");
            }
        }
    });
}
