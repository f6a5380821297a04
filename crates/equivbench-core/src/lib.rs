//! equivbench core library
//!
//! Parses the captured stdout/stderr of equivalence-checking benchmark runs
//! into typed run records, aggregates repeated trials, and builds comparison
//! tables across tool configurations.

pub mod aggregate;
pub mod collection;
pub mod compare;
pub mod config;
pub mod error;
pub mod metric;
pub mod metrics;
pub mod obs;
pub mod parsers;
pub mod payload;
pub mod record;
pub mod report;
pub mod telemetry;
pub mod verdict;

pub use aggregate::{aggregate_collections, median, AggregateRecord, Aggregated, Reduction};
pub use collection::{BenchmarkCollection, CollectionLayout, IncompletePolicy};
pub use compare::{
    consensus, Consensus, MultiComparator, PairwiseComparator, Row, Style, StyledTable, Table,
    Value,
};
pub use config::{CompareConfig, ConfigurationEntry};
pub use error::{BenchError, Result};
pub use metric::{Metric, Sample};
pub use parsers::{
    CounterLines, DepthLines, EquivLines, LineParser, ParserFactory, RunLim, Stream, TimingLines,
};
pub use record::{Dialect, RunConfig, RunRecord};
pub use report::{render_table_md, write_table_json, write_table_md, TableArtifact};
pub use verdict::{BoundVerdict, HandlerFactory, ResultHandler, TimerVerdict};

pub use metrics::METRICS;
pub use obs::BenchmarkSpan;
pub use telemetry::init_tracing;

/// equivbench version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
