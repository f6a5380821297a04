//! Reductions over repeated runs of one configuration (e.g. several seeds).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::BenchmarkCollection;
use crate::metric::{Metric, Sample};
use crate::record::RunRecord;

/// How to reduce a metric across repeated runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    /// Median of all present numeric values.
    #[default]
    Central,
    /// Every run's value, `None` for absent runs or missing values.
    Raw,
}

/// Result of a reduction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Aggregated {
    /// `None` means insufficient data.
    Central(Option<f64>),
    Raw(Vec<Option<Sample>>),
}

impl Aggregated {
    pub fn central(&self) -> Option<f64> {
        match self {
            Aggregated::Central(v) => *v,
            Aggregated::Raw(_) => None,
        }
    }
}

/// Median of the present samples.
///
/// Absent entries are skipped. Returns `None` when nothing is left, or when
/// any present sample is not a finite number.
pub fn median(samples: &[Option<Sample>]) -> Option<f64> {
    let mut values = Vec::with_capacity(samples.len());
    for sample in samples.iter().flatten() {
        match sample.as_number() {
            Some(v) if v.is_finite() => values.push(v),
            _ => {
                tracing::debug!(sample = %sample, "non-numeric sample, median undefined");
                return None;
            }
        }
    }
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Repeated runs believed to sample the same configuration.
#[derive(Debug, Default)]
pub struct AggregateRecord {
    runs: Vec<Option<RunRecord>>,
}

impl AggregateRecord {
    pub fn new(runs: Vec<Option<RunRecord>>) -> Self {
        Self { runs }
    }

    pub fn push(&mut self, run: Option<RunRecord>) {
        self.runs.push(run);
    }

    pub fn runs(&self) -> &[Option<RunRecord>] {
        &self.runs
    }

    /// `metric` for every run, in order.
    pub fn samples(&self, metric: Metric) -> Vec<Option<Sample>> {
        self.runs
            .iter()
            .map(|run| run.as_ref().and_then(|r| metric.extract(r)))
            .collect()
    }

    pub fn get(&self, metric: Metric, reduction: Reduction) -> Aggregated {
        let samples = self.samples(metric);
        match reduction {
            Reduction::Central => Aggregated::Central(median(&samples)),
            Reduction::Raw => Aggregated::Raw(samples),
        }
    }

    /// Number of runs that succeeded.
    pub fn succeeded_count(&self) -> usize {
        self.runs
            .iter()
            .flatten()
            .filter(|r| r.succeeded())
            .count()
    }
}

/// Group repeated trials per benchmark.
///
/// Every benchmark known to any collection gets one slot per collection, in
/// collection order; a collection without the benchmark contributes `None`.
pub fn aggregate_collections(
    collections: Vec<BenchmarkCollection>,
) -> BTreeMap<String, AggregateRecord> {
    let trials = collections.len();
    let mut grouped: BTreeMap<String, Vec<Option<RunRecord>>> = BTreeMap::new();
    for (idx, collection) in collections.into_iter().enumerate() {
        for (name, run) in collection.into_entries() {
            let slots = grouped
                .entry(name)
                .or_insert_with(|| std::iter::repeat_with(|| None).take(trials).collect());
            slots[idx] = run;
        }
    }
    grouped
        .into_iter()
        .map(|(name, runs)| (name, AggregateRecord::new(runs)))
        .collect()
}
