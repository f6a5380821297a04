//! Verdict for MILP encodings, read from the solver's objective bound.
//!
//! The encoding maximises the output difference of the two networks, so a
//! best objective above [`EQUIV_THRESHOLD`] is a witness of non-equivalence.
//! Smaller values are solver rounding noise.

use std::any::Any;

use serde::Serialize;

use super::ResultHandler;
use crate::error::{BenchError, Result};
use crate::parsers::runlim::{runlim_status, STATUS_OK};
use crate::parsers::{parse_number, to_snapshot, Stream};

/// Objective values at or below this count as equivalent.
pub const EQUIV_THRESHOLD: f64 = 1e-8;

const BEST_OBJECTIVE: &str = "Best objective";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundVerdict {
    pub status: Option<String>,
    /// Last objective value parsed from the solver log.
    pub objective: Option<f64>,
    pub is_equiv: bool,
}

impl Default for BoundVerdict {
    fn default() -> Self {
        Self {
            status: None,
            objective: None,
            is_equiv: true,
        }
    }
}

impl BoundVerdict {
    pub const NAME: &'static str = "bound";

    pub fn factory() -> Box<dyn ResultHandler> {
        Box::<Self>::default()
    }
}

impl ResultHandler for BoundVerdict {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&mut self, line: &str, stream: Stream) {
        match stream {
            Stream::Stdout => {
                let Some(rest) = line.strip_prefix(BEST_OBJECTIVE) else {
                    return;
                };
                // "Best objective 1.2e-02, best bound 1.2e-02, gap 0.0000%"
                let value = rest.split(',').next().unwrap_or("");
                if let Some(objective) = parse_number::<f64>(Self::NAME, value) {
                    self.objective = Some(objective);
                    if objective > EQUIV_THRESHOLD {
                        self.is_equiv = false;
                    }
                }
            }
            Stream::Stderr => {
                if let Some(status) = runlim_status(line) {
                    self.status = Some(status.to_string());
                }
            }
        }
    }

    fn check(&self) -> Result<()> {
        if self.status.is_none() {
            return Err(BenchError::Incomplete {
                parser: Self::NAME,
                field: "status",
            });
        }
        Ok(())
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn is_equiv(&self) -> bool {
        self.is_equiv
    }

    fn did_succeed(&self) -> bool {
        self.status.as_deref() == Some(STATUS_OK)
    }

    fn snapshot(&self) -> serde_json::Value {
        to_snapshot(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_below_threshold_stays_equivalent() {
        let mut v = BoundVerdict::default();
        v.handle(
            "Best objective 0.000000001, best bound 0.0, gap 0.0000%",
            Stream::Stdout,
        );
        assert!(v.is_equiv());
        assert_eq!(v.objective, Some(1e-9));
    }

    #[test]
    fn test_objective_above_threshold_is_not_equivalent() {
        let mut v = BoundVerdict::default();
        v.handle("Best objective 0.01, best bound 0.02, gap 50%", Stream::Stdout);
        assert!(!v.is_equiv());
    }

    #[test]
    fn test_objective_at_threshold_stays_equivalent() {
        let mut v = BoundVerdict::default();
        v.handle("Best objective 1e-8, best bound 1e-8", Stream::Stdout);
        assert!(v.is_equiv());
    }

    #[test]
    fn test_missing_incumbent_is_skipped() {
        let mut v = BoundVerdict::default();
        v.handle("Best objective -, best bound 0.5, gap -", Stream::Stdout);
        assert_eq!(v.objective, None);
        assert!(v.is_equiv());
    }

    #[test]
    fn test_success_depends_only_on_status() {
        let mut v = BoundVerdict::default();
        v.handle("[runlim] status:\tok", Stream::Stderr);
        assert!(v.did_succeed());

        let mut v = BoundVerdict::default();
        v.handle("[runlim] status:\tout of time", Stream::Stderr);
        assert!(!v.did_succeed());
        assert_eq!(v.status(), Some("out of time"));
    }

    #[test]
    fn test_objective_on_stderr_is_ignored() {
        let mut v = BoundVerdict::default();
        v.handle("Best objective 5.0, best bound 5.0", Stream::Stderr);
        assert_eq!(v, BoundVerdict::default());
    }
}
