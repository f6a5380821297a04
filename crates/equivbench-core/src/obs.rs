//! Structured observability hooks for log ingestion.
//!
//! This module provides:
//! - Benchmark-scoped tracing spans via the `BenchmarkSpan` RAII guard
//! - Emission functions for parse lifecycle events

use tracing::{debug, info, warn};

/// RAII guard that enters a benchmark-scoped span while its captures are parsed.
///
/// ```ignore
/// let _span = BenchmarkSpan::enter("mnist_0_3");
/// // every event below is tagged with benchmark = "mnist_0_3"
/// ```
pub struct BenchmarkSpan {
    _span: tracing::span::EnteredSpan,
}

impl BenchmarkSpan {
    /// Create and enter a span tagged with the benchmark name.
    pub fn enter(benchmark: &str) -> Self {
        let span = tracing::info_span!("equivbench.benchmark", benchmark = %benchmark);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a run record was fully replayed and passed its checks.
pub fn emit_record_parsed(lines: u64, succeeded: bool) {
    debug!(event = "record.parsed", lines = lines, succeeded = succeeded);
}

/// Emit event: a run record failed its completeness check and was dropped.
pub fn emit_record_incomplete(benchmark: &str, error: &dyn std::fmt::Display) {
    warn!(event = "record.incomplete", benchmark = %benchmark, error = %error);
}

/// Emit event: a single payload fragment could not be converted.
pub fn emit_parse_error(parser: &str, fragment: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "line.parse_error",
        parser = %parser,
        fragment = %fragment,
        error = %error,
    );
}

/// Emit event: a result directory was scanned into a collection.
pub fn emit_collection_loaded(dir: &str, present: usize, missing: usize) {
    info!(
        event = "collection.loaded",
        dir = %dir,
        present = present,
        missing = missing,
    );
}
