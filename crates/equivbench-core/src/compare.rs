//! Cross-configuration comparison tables.
//!
//! A comparator merges the [`BenchmarkCollection`]s of several
//! configurations into a [`Table`] of [`Value`] cells, one row per benchmark.
//! Highlighting is computed separately by the comparator's `decorate`
//! function so any renderer can consume values and styles independently.
//!
//! Missing data never raises. A configuration without a run for a benchmark
//! becomes [`Value::Absent`], a failed run becomes [`Value::Failure`]
//! carrying its status, and a successful run that never reported the metric
//! becomes [`Value::Unknown`]. None of them take part in numeric comparisons.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::collection::BenchmarkCollection;
use crate::metric::{Metric, Sample};
use crate::parsers::runlim::STATUS_OK;
use crate::record::RunRecord;

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Text(String),
    /// The run failed; carries its status token.
    Failure(String),
    /// The configuration has no run for this benchmark.
    Absent,
    /// The run has no value for this column.
    Unknown,
}

impl Value {
    /// The numeric value, if this cell takes part in comparisons.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    fn from_sample(sample: Option<Sample>) -> Self {
        match sample {
            Some(Sample::Number(v)) => Value::Number(v),
            Some(Sample::Text(s)) => Value::Text(s),
            None => Value::Unknown,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v:.2}"),
            Value::Text(s) => f.write_str(s),
            Value::Failure(status) => write!(f, "✗ {status}"),
            Value::Absent | Value::Unknown => f.write_str("?"),
        }
    }
}

/// Cell decoration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Plain,
    Bold,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub benchmark: String,
    pub values: Vec<Value>,
}

/// Value matrix; `columns` labels `Row::values` (the benchmark name is implicit).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// A table together with its decoration, row for row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledTable {
    pub table: Table,
    pub styles: Vec<Vec<Style>>,
}

impl StyledTable {
    pub fn new(table: Table, decorate: impl Fn(&Row) -> Vec<Style>) -> Self {
        let styles = table.rows.iter().map(decorate).collect();
        Self { table, styles }
    }
}

/// Consensus equivalence verdict across configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Consensus {
    Equivalent,
    NotEquivalent,
    /// No successful run, or successful runs disagree.
    Unknown,
}

impl fmt::Display for Consensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consensus::Equivalent => f.write_str("equivalent"),
            Consensus::NotEquivalent => f.write_str("not-equivalent"),
            Consensus::Unknown => f.write_str("unknown"),
        }
    }
}

/// Combine the equivalence flags of the successful runs.
///
/// The first successful run sets the candidate verdict; any disagreeing
/// successful run degrades it to [`Consensus::Unknown`].
pub fn consensus<'r>(runs: impl IntoIterator<Item = Option<&'r RunRecord>>) -> Consensus {
    let mut candidate = None;
    for run in runs.into_iter().flatten().filter(|r| r.succeeded()) {
        match candidate {
            None => candidate = Some(run.is_equiv()),
            Some(equiv) if equiv != run.is_equiv() => return Consensus::Unknown,
            Some(_) => {}
        }
    }
    match candidate {
        Some(true) => Consensus::Equivalent,
        Some(false) => Consensus::NotEquivalent,
        None => Consensus::Unknown,
    }
}

fn union_of_names<'a>(collections: impl IntoIterator<Item = &'a BenchmarkCollection>) -> Vec<String> {
    let names: BTreeSet<&str> = collections.into_iter().flat_map(|c| c.names()).collect();
    names.into_iter().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Pairwise
// ---------------------------------------------------------------------------

pub const PAIRWISE_COLUMNS: [&str; 8] = [
    "Status (1)",
    "Status (2)",
    "Real (1)",
    "Real (2)",
    "Time (1)",
    "Time (2)",
    "Mem (1)",
    "Mem (2)",
];

/// Resource comparison of exactly two configurations.
pub struct PairwiseComparator<'a> {
    first: &'a BenchmarkCollection,
    second: &'a BenchmarkCollection,
    benchmarks: Vec<String>,
}

impl<'a> PairwiseComparator<'a> {
    /// Compare every benchmark known to either collection.
    pub fn new(first: &'a BenchmarkCollection, second: &'a BenchmarkCollection) -> Self {
        Self {
            first,
            second,
            benchmarks: union_of_names([first, second]),
        }
    }

    /// Restrict and order the rows explicitly.
    pub fn with_benchmarks(mut self, benchmarks: Vec<String>) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    pub fn table(&self) -> Table {
        let rows = self
            .benchmarks
            .iter()
            .map(|b| {
                let runs = [self.first.get(b), self.second.get(b)];
                let mut values = Vec::with_capacity(PAIRWISE_COLUMNS.len());
                for run in runs {
                    values.push(Value::from_sample(run.and_then(|r| Metric::Status.extract(r))));
                }
                for metric in [Metric::Real, Metric::Time, Metric::Space] {
                    for run in runs {
                        values.push(Value::from_sample(run.and_then(|r| metric.extract(r))));
                    }
                }
                Row {
                    benchmark: b.clone(),
                    values,
                }
            })
            .collect();
        Table {
            columns: PAIRWISE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Status cells other than `ok` are failures; in each numeric pair the
    /// smaller value is bold (configuration 2 on ties). A pair with a
    /// missing side stays plain.
    pub fn decorate(row: &Row) -> Vec<Style> {
        let mut styles = vec![Style::Plain; row.values.len()];
        for (idx, style) in styles.iter_mut().enumerate().take(2) {
            if !matches!(&row.values[idx], Value::Text(s) if s == STATUS_OK) {
                *style = Style::Failure;
            }
        }
        let mut idx = 2;
        while idx + 1 < row.values.len() {
            if let (Some(a), Some(b)) = (row.values[idx].as_number(), row.values[idx + 1].as_number())
            {
                if b > a {
                    styles[idx] = Style::Bold;
                } else {
                    styles[idx + 1] = Style::Bold;
                }
            }
            idx += 2;
        }
        styles
    }

    pub fn styled(&self) -> StyledTable {
        StyledTable::new(self.table(), Self::decorate)
    }
}

// ---------------------------------------------------------------------------
// Multi-way
// ---------------------------------------------------------------------------

/// Column label of the consensus verdict.
pub const CONSENSUS_COLUMN: &str = "Equiv";

/// Comparison of one metric across any number of configurations.
pub struct MultiComparator<'a> {
    labels: Vec<String>,
    collections: Vec<&'a BenchmarkCollection>,
    benchmarks: Vec<String>,
}

impl<'a> MultiComparator<'a> {
    /// `configs` are `(label, collection)` pairs in column order.
    pub fn new<S: Into<String>>(
        configs: impl IntoIterator<Item = (S, &'a BenchmarkCollection)>,
    ) -> Self {
        let (labels, collections): (Vec<String>, Vec<&BenchmarkCollection>) = configs
            .into_iter()
            .map(|(label, collection)| (label.into(), collection))
            .unzip();
        let benchmarks = union_of_names(collections.iter().copied());
        Self {
            labels,
            collections,
            benchmarks,
        }
    }

    pub fn with_benchmarks(mut self, benchmarks: Vec<String>) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    pub fn benchmarks(&self) -> &[String] {
        &self.benchmarks
    }

    fn runs(&self, benchmark: &str) -> impl Iterator<Item = Option<&'a RunRecord>> + '_ {
        let benchmark = benchmark.to_string();
        self.collections
            .iter()
            .copied()
            .map(move |c| c.get(&benchmark))
    }

    /// The cell for one configuration's run.
    pub fn cell(run: Option<&RunRecord>, metric: Metric) -> Value {
        match run {
            None => Value::Absent,
            Some(run) if !run.succeeded() => {
                Value::Failure(run.status().unwrap_or("unknown").to_string())
            }
            Some(run) => Value::from_sample(metric.extract(run)),
        }
    }

    pub fn table(&self, metric: Metric) -> Table {
        let rows = self
            .benchmarks
            .iter()
            .map(|b| Row {
                benchmark: b.clone(),
                values: self.runs(b).map(|run| Self::cell(run, metric)).collect(),
            })
            .collect();
        Table {
            columns: self.labels.clone(),
            rows,
        }
    }

    pub fn consensus(&self, benchmark: &str) -> Consensus {
        consensus(self.runs(benchmark))
    }

    /// Like [`table`](Self::table) with a trailing consensus column.
    pub fn table_with_consensus(&self, metric: Metric) -> Table {
        let mut table = self.table(metric);
        table.columns.push(CONSENSUS_COLUMN.to_string());
        for row in &mut table.rows {
            let verdict = self.consensus(&row.benchmark);
            row.values.push(Value::Text(verdict.to_string()));
        }
        table
    }

    /// Every cell equal to the row minimum is bold; failed and absent runs
    /// are marked as failures. A metric the run did not report stays plain.
    pub fn decorate(row: &Row) -> Vec<Style> {
        let min = row
            .values
            .iter()
            .filter_map(Value::as_number)
            .min_by(f64::total_cmp);
        row.values
            .iter()
            .map(|value| match value {
                Value::Failure(_) | Value::Absent => Style::Failure,
                v if v.as_number().is_some() && v.as_number() == min => Style::Bold,
                _ => Style::Plain,
            })
            .collect()
    }

    pub fn styled(&self, metric: Metric, with_consensus: bool) -> StyledTable {
        let table = if with_consensus {
            self.table_with_consensus(metric)
        } else {
            self.table(metric)
        };
        StyledTable::new(table, Self::decorate)
    }
}
