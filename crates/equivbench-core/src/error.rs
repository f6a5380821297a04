//! Error taxonomy for equivbench.
//!
//! Only the fatal categories live here. Recoverable payload errors are logged
//! and skipped by the parsers themselves, and missing data during aggregation
//! or comparison is represented as `None` / placeholder cells.

use std::path::PathBuf;

/// equivbench errors.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parser '{parser}' never received required value '{field}'")]
    Incomplete {
        parser: &'static str,
        field: &'static str,
    },

    #[error("parser '{0}' registered more than once")]
    DuplicateParser(&'static str),

    #[error("benchmark '{benchmark}' has no matching stream capture at {path:?}")]
    MissingStream { benchmark: String, path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a completeness failure of a single run.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, BenchError::Incomplete { .. })
    }
}

/// Result type for equivbench operations.
pub type Result<T> = std::result::Result<T, BenchError>;
