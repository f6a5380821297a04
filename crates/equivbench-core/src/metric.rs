//! Typed metric extraction from run records.
//!
//! Each [`Metric`] names one attribute of a run and knows how to pull it out
//! of a [`RunRecord`]. Metrics whose parser is not registered on a record
//! extract as `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;
use crate::parsers::{CounterLines, DepthLines, EquivLines, TimingLines};
use crate::record::RunRecord;
use crate::verdict::BoundVerdict;

/// One extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    Number(f64),
    Text(String),
}

impl Sample {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Sample::Number(v) => Some(*v),
            Sample::Text(_) => None,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sample::Number(v) => write!(f, "{v}"),
            Sample::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// runlim wall-clock seconds.
    Real,
    /// runlim CPU seconds.
    Time,
    /// runlim peak memory (MB).
    Space,
    /// Status token of the run.
    Status,
    /// Number of `[VALID_DEPTH]` entries.
    ValidDepth,
    /// Number of `[INVALID_DEPTH]` entries.
    InvalidDepth,
    MaxValidDepth,
    EquivCount,
    NequivCount,
    /// Number of `[EXACT_COUNTERS]` triples.
    ExactCounters,
    /// Number of `[SPLIT_POINTS]` triples.
    SplitPoints,
    CegarTime,
    OptimalTime,
    /// Last solver objective of the MILP verdict.
    Objective,
}

impl Metric {
    pub const ALL: [Metric; 14] = [
        Metric::Real,
        Metric::Time,
        Metric::Space,
        Metric::Status,
        Metric::ValidDepth,
        Metric::InvalidDepth,
        Metric::MaxValidDepth,
        Metric::EquivCount,
        Metric::NequivCount,
        Metric::ExactCounters,
        Metric::SplitPoints,
        Metric::CegarTime,
        Metric::OptimalTime,
        Metric::Objective,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Real => "real",
            Metric::Time => "time",
            Metric::Space => "space",
            Metric::Status => "status",
            Metric::ValidDepth => "valid_depth",
            Metric::InvalidDepth => "invalid_depth",
            Metric::MaxValidDepth => "max_valid_depth",
            Metric::EquivCount => "equiv_count",
            Metric::NequivCount => "nequiv_count",
            Metric::ExactCounters => "exact_counters",
            Metric::SplitPoints => "split_points",
            Metric::CegarTime => "cegar_time",
            Metric::OptimalTime => "optimal_time",
            Metric::Objective => "objective",
        }
    }

    /// Pull this metric out of a run record.
    pub fn extract(&self, run: &RunRecord) -> Option<Sample> {
        let count = |n: usize| Some(Sample::Number(n as f64));
        match self {
            Metric::Real => run.runlim()?.real.map(Sample::Number),
            Metric::Time => run.runlim()?.time.map(Sample::Number),
            Metric::Space => run.runlim()?.space.map(Sample::Number),
            Metric::Status => run.status().map(|s| Sample::Text(s.to_string())),
            Metric::ValidDepth => count(run.parser::<DepthLines>()?.valid_depth.len()),
            Metric::InvalidDepth => count(run.parser::<DepthLines>()?.invalid_depth.len()),
            Metric::MaxValidDepth => run
                .parser::<DepthLines>()?
                .max_valid_depth()
                .map(|d| Sample::Number(d as f64)),
            Metric::EquivCount => count(run.parser::<EquivLines>()?.equiv.len()),
            Metric::NequivCount => count(run.parser::<EquivLines>()?.nonequiv.len()),
            Metric::ExactCounters => count(run.parser::<CounterLines>()?.exact_counters.len()),
            Metric::SplitPoints => count(run.parser::<CounterLines>()?.split_points.len()),
            Metric::CegarTime => run.parser::<TimingLines>()?.cegar_time.map(Sample::Number),
            Metric::OptimalTime => run
                .parser::<TimingLines>()?
                .optimal_time
                .map(Sample::Number),
            Metric::Objective => run.handler_as::<BoundVerdict>()?.objective.map(Sample::Number),
        }
    }

    /// Numeric value of this metric, `None` for missing or textual values.
    pub fn extract_number(&self, run: &RunRecord) -> Option<f64> {
        self.extract(run).and_then(|s| s.as_number())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Metric {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| BenchError::Config(format!("unknown metric '{s}'")))
    }
}
