//! Observability tests for ingestion tracing.
//!
//! These verify the structured emission helpers and span guard run under a
//! captured subscriber.

use equivbench_core::obs::{
    emit_collection_loaded, emit_parse_error, emit_record_incomplete, emit_record_parsed,
};
use equivbench_core::metrics::Metrics;
use equivbench_core::{BenchError, BenchmarkSpan};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_emit_record_parsed() {
    emit_record_parsed(120, true);
}

#[traced_test]
#[test]
fn test_emit_record_incomplete() {
    let err = BenchError::Incomplete {
        parser: "runlim",
        field: "status",
    };
    emit_record_incomplete("mnist_0", &err);
}

#[traced_test]
#[test]
fn test_emit_parse_error() {
    emit_parse_error("equiv", "abc", &"invalid float literal");
}

#[traced_test]
#[test]
fn test_emit_collection_loaded() {
    emit_collection_loaded("/tmp/results", 10, 2);
}

#[traced_test]
#[test]
fn test_benchmark_span_enter() {
    let span = BenchmarkSpan::enter("mnist_0");
    emit_record_parsed(1, false);
    drop(span);
}

#[test]
fn test_local_metrics_flush() {
    let metrics = Metrics::new();
    metrics.add_lines(4);
    metrics.inc_records_parsed();
    metrics.flush();
    assert_eq!(metrics.records_parsed(), 1);
}
