//! Global atomic counters for ingestion statistics.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a CLI command).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    lines_replayed: AtomicU64,
    records_parsed: AtomicU64,
    records_incomplete: AtomicU64,
    parse_errors: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            lines_replayed: AtomicU64::new(0),
            records_parsed: AtomicU64::new(0),
            records_incomplete: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
        }
    }

    /// Add `n` to the lines-replayed counter.
    pub fn add_lines(&self, n: u64) {
        self.lines_replayed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_records_parsed(&self) {
        self.records_parsed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "records_parsed", "counter incremented");
    }

    pub fn inc_records_incomplete(&self) {
        self.records_incomplete.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "records_incomplete", "counter incremented");
    }

    pub fn inc_parse_errors(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "parse_errors", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            lines_replayed = self.lines_replayed(),
            records_parsed = self.records_parsed(),
            records_incomplete = self.records_incomplete(),
            parse_errors = self.parse_errors(),
        );
    }

    pub fn lines_replayed(&self) -> u64 {
        self.lines_replayed.load(Ordering::Relaxed)
    }

    pub fn records_parsed(&self) -> u64 {
        self.records_parsed.load(Ordering::Relaxed)
    }

    pub fn records_incomplete(&self) -> u64 {
        self.records_incomplete.load(Ordering::Relaxed)
    }

    pub fn parse_errors(&self) -> u64 {
        self.parse_errors.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.lines_replayed.store(0, Ordering::Relaxed);
        self.records_parsed.store(0, Ordering::Relaxed);
        self.records_incomplete.store(0, Ordering::Relaxed);
        self.parse_errors.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        m.add_lines(10);
        m.add_lines(5);
        assert_eq!(m.lines_replayed(), 15);

        m.inc_records_parsed();
        m.inc_records_incomplete();
        m.inc_parse_errors();
        m.inc_parse_errors();
        assert_eq!(m.records_parsed(), 1);
        assert_eq!(m.records_incomplete(), 1);
        assert_eq!(m.parse_errors(), 2);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.add_lines(3);
        m.inc_records_parsed();
        m.inc_parse_errors();
        m.reset();
        assert_eq!(m.lines_replayed(), 0);
        assert_eq!(m.records_parsed(), 0);
        assert_eq!(m.parse_errors(), 0);
    }
}
