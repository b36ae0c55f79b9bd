//! Logging collaborator for validation reports
//!
//! The validator never talks to a global logger directly; it writes through
//! an injected [`LogSink`]. [`TracingSink`] is the default and forwards to
//! `tracing`. [`MemorySink`] keeps lines in memory for tests and for callers
//! that want to attach the trace to their own output.

use std::sync::{Arc, Mutex};
use tracing::Level;

/// Destination for textual report lines. Implementations must not panic.
pub trait LogSink: Send + Sync {
    fn record(&self, level: Level, message: &str);
}

/// Forwards lines to `tracing` under target `prf_fairness::report`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "prf_fairness::report", "{}", message),
            Level::WARN => tracing::warn!(target: "prf_fairness::report", "{}", message),
            Level::INFO => tracing::info!(target: "prf_fairness::report", "{}", message),
            Level::DEBUG => tracing::debug!(target: "prf_fairness::report", "{}", message),
            _ => tracing::trace!(target: "prf_fairness::report", "{}", message),
        }
    }
}

/// In-memory sink
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(Level, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Captured messages without their levels
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|(_, m)| m).collect()
    }

    /// Check if any captured line contains `pattern`
    pub fn contains(&self, pattern: &str) -> bool {
        self.records().iter().any(|(_, m)| m.contains(pattern))
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl LogSink for MemorySink {
    fn record(&self, level: Level, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, message.to_string()));
    }
}
