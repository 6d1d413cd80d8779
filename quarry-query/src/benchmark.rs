//! Per-statement benchmark recording.
//!
//! Every statement executed through a [`Database`](crate::Database) with
//! benchmarking enabled appends one [`BenchmarkEntry`]. Handles are cheap to
//! clone and all clones share the same log. [`BenchmarkLog::global`] is the
//! process-wide log used unless another one is injected.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use parking_lot::Mutex;

static GLOBAL: LazyLock<BenchmarkLog> = LazyLock::new(BenchmarkLog::new);

/// One executed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkEntry {
    /// The SQL text as sent to the driver.
    pub sql: String,
    /// Wall time spent executing.
    pub elapsed: Duration,
    /// Rows returned or affected.
    pub rows: u64,
}

impl BenchmarkEntry {
    /// Elapsed time in seconds.
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Append-only, lock-protected list of benchmark entries.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkLog {
    entries: Arc<Mutex<Vec<BenchmarkEntry>>>,
}

impl BenchmarkLog {
    /// Create an empty, isolated log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide log.
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// Append an entry.
    pub fn record(&self, entry: BenchmarkEntry) {
        self.entries.lock().push(entry);
    }

    /// Snapshot of all entries in recording order.
    pub fn entries(&self) -> Vec<BenchmarkEntry> {
        self.entries.lock().clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Sum of elapsed time over all entries.
    pub fn total_time(&self) -> Duration {
        self.entries.lock().iter().map(|e| e.elapsed).sum()
    }
}
