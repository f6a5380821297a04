//! Benchmark collections: every run of one configuration, keyed by benchmark.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::metrics::METRICS;
use crate::obs::{self, BenchmarkSpan};
use crate::record::{RunConfig, RunRecord};

/// File-name suffixes pairing the two captures of a benchmark in a directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionLayout {
    pub stdout_suffix: String,
    pub stderr_suffix: String,
}

impl Default for CollectionLayout {
    fn default() -> Self {
        Self {
            stdout_suffix: ".out".to_string(),
            stderr_suffix: ".err".to_string(),
        }
    }
}

/// What to do with a benchmark whose record cannot be completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncompletePolicy {
    /// Keep the benchmark as absent (`None`) and log it. Applies to
    /// incomplete records, unpaired captures and unreadable capture files.
    #[default]
    Skip,
    /// Fail the whole load.
    Abort,
}

/// Benchmark name → run record, `None` when the benchmark has no usable run.
#[derive(Debug, Default)]
pub struct BenchmarkCollection {
    runs: BTreeMap<String, Option<RunRecord>>,
}

impl BenchmarkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every capture pair in `dir`.
    ///
    /// A benchmark is any file named `<name><stdout_suffix>`; its stderr is
    /// expected next to it as `<name><stderr_suffix>`.
    pub fn load(
        dir: &Path,
        config: &RunConfig,
        layout: &CollectionLayout,
        policy: IncompletePolicy,
    ) -> Result<Self> {
        let mut names = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|e| BenchError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| BenchError::io(dir, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(layout.stdout_suffix.as_str()) {
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let mut collection = Self::new();
        for name in names {
            let _span = BenchmarkSpan::enter(&name);
            let stdout = dir.join(format!("{name}{}", layout.stdout_suffix));
            let stderr = dir.join(format!("{name}{}", layout.stderr_suffix));

            let parsed = if stderr.is_file() {
                RunRecord::from_files(&stdout, &stderr, config)
            } else {
                Err(BenchError::MissingStream {
                    benchmark: name.clone(),
                    path: stderr,
                })
            };

            let record = match parsed {
                Ok(record) => Some(record),
                Err(e) if policy == IncompletePolicy::Skip && is_skippable(&e) => {
                    obs::emit_record_incomplete(&name, &e);
                    METRICS.inc_records_incomplete();
                    None
                }
                Err(e) => return Err(e),
            };
            collection.insert(name, record);
        }

        obs::emit_collection_loaded(
            &dir.display().to_string(),
            collection.present_count(),
            collection.len() - collection.present_count(),
        );
        Ok(collection)
    }

    pub fn insert(&mut self, benchmark: impl Into<String>, record: Option<RunRecord>) {
        self.runs.insert(benchmark.into(), record);
    }

    /// The run for `benchmark`, if it exists and was parsed.
    pub fn get(&self, benchmark: &str) -> Option<&RunRecord> {
        self.runs.get(benchmark).and_then(Option::as_ref)
    }

    pub fn contains(&self, benchmark: &str) -> bool {
        self.runs.contains_key(benchmark)
    }

    /// Benchmark names in sorted order, including absent ones.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&RunRecord>)> {
        self.runs.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of benchmarks with a parsed run.
    pub fn present_count(&self) -> usize {
        self.runs.values().filter(|r| r.is_some()).count()
    }

    /// Record every benchmark in `names` that is not yet known as absent.
    pub fn ensure_benchmarks<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.runs.entry(name.into()).or_insert(None);
        }
    }

    /// Consume the collection, yielding its entries in sorted order.
    pub fn into_entries(self) -> impl Iterator<Item = (String, Option<RunRecord>)> {
        self.runs.into_iter()
    }
}

impl FromIterator<(String, Option<RunRecord>)> for BenchmarkCollection {
    fn from_iter<I: IntoIterator<Item = (String, Option<RunRecord>)>>(iter: I) -> Self {
        Self {
            runs: iter.into_iter().collect(),
        }
    }
}

/// Errors confined to one benchmark's captures. Failing to list the
/// directory itself is never skippable.
fn is_skippable(e: &BenchError) -> bool {
    e.is_incomplete() || matches!(e, BenchError::MissingStream { .. } | BenchError::Io { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Dialect;

    fn ok_record() -> RunRecord {
        let stderr = "[runlim] real: 1\n[runlim] time: 1\n[runlim] space: 1\n[runlim] status: ok\n";
        RunRecord::from_streams(
            "".as_bytes(),
            stderr.as_bytes(),
            &RunConfig::for_dialect(Dialect::Resources),
        )
        .expect("record")
    }

    #[test]
    fn test_ensure_benchmarks_keeps_existing() {
        let mut c = BenchmarkCollection::new();
        c.insert("a", Some(ok_record()));
        c.ensure_benchmarks(["a", "b"]);
        assert_eq!(c.len(), 2);
        assert!(c.get("a").is_some());
        assert!(c.get("b").is_none());
        assert!(c.contains("b"));
        assert_eq!(c.present_count(), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let c: BenchmarkCollection = vec![("z".to_string(), None), ("a".to_string(), None)]
            .into_iter()
            .collect();
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["a", "z"]);
    }

    #[test]
    fn test_default_layout() {
        let layout = CollectionLayout::default();
        assert_eq!(layout.stdout_suffix, ".out");
        assert_eq!(layout.stderr_suffix, ".err");
    }
}
