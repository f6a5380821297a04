//! TOML description of the configurations to compare.
//!
//! ```toml
//! benchmarks = ["mnist_0", "mnist_1"]   # optional, default: all found
//! stderr_suffix = ".stderr"             # optional, default ".err"
//!
//! [[configuration]]
//! label = "cegar"
//! dir = "results/cegar"
//!
//! [[configuration]]
//! label = "milp"
//! dir = "results/milp"
//! dialect = "milp"
//! ```
//!
//! Relative `dir` entries are resolved against the config file's directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collection::{BenchmarkCollection, CollectionLayout, IncompletePolicy};
use crate::error::{BenchError, Result};
use crate::record::{Dialect, RunConfig};

/// One configuration (column group) of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigurationEntry {
    pub label: String,
    pub dir: PathBuf,
    #[serde(default)]
    pub dialect: Dialect,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompareConfig {
    #[serde(default)]
    pub benchmarks: Vec<String>,
    #[serde(default)]
    pub stdout_suffix: Option<String>,
    #[serde(default)]
    pub stderr_suffix: Option<String>,
    #[serde(rename = "configuration", default)]
    pub configurations: Vec<ConfigurationEntry>,
}

impl CompareConfig {
    /// Parse and validate a config document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CompareConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file, resolving relative directories against its location.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            for entry in &mut config.configurations {
                if entry.dir.is_relative() {
                    entry.dir = base.join(&entry.dir);
                }
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.configurations.is_empty() {
            return Err(BenchError::Config(
                "at least one [[configuration]] is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for entry in &self.configurations {
            if entry.label.is_empty() {
                return Err(BenchError::Config("configuration label is empty".to_string()));
            }
            if !seen.insert(entry.label.as_str()) {
                return Err(BenchError::Config(format!(
                    "duplicate configuration label '{}'",
                    entry.label
                )));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> CollectionLayout {
        let default = CollectionLayout::default();
        CollectionLayout {
            stdout_suffix: self
                .stdout_suffix
                .clone()
                .unwrap_or(default.stdout_suffix),
            stderr_suffix: self
                .stderr_suffix
                .clone()
                .unwrap_or(default.stderr_suffix),
        }
    }

    /// Load every configured directory, in config order.
    ///
    /// When `benchmarks` is set, each collection also lists the benchmarks it
    /// did not run as absent.
    pub fn load_collections(
        &self,
        policy: IncompletePolicy,
    ) -> Result<Vec<(String, BenchmarkCollection)>> {
        let layout = self.layout();
        let mut out = Vec::with_capacity(self.configurations.len());
        for entry in &self.configurations {
            let run_config = RunConfig::for_dialect(entry.dialect);
            let mut collection =
                BenchmarkCollection::load(&entry.dir, &run_config, &layout, policy)?;
            collection.ensure_benchmarks(self.benchmarks.iter().cloned());
            out.push((entry.label.clone(), collection));
        }
        Ok(out)
    }
}
