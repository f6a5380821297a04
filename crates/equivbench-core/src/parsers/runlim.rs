//! Resource-usage trailer written by the `runlim` wrapper on stderr.
//!
//! ```text
//! [runlim] time:          12.34 seconds
//! [runlim] space:         512.0 MB
//! [runlim] status:        ok
//! ```

use std::any::Any;

use serde::Serialize;

use super::{parse_number, to_snapshot, LineParser};
use crate::error::{BenchError, Result};

/// Status token runlim prints for a process that exited normally.
pub const STATUS_OK: &str = "ok";

const TAG: &str = "[runlim]";

/// Split a runlim trailer line into its key and trimmed value text.
///
/// Returns `None` for lines that are not runlim trailers. The value is empty
/// when the key has nothing after it.
pub fn runlim_field(line: &str) -> Option<(&str, &str)> {
    let content = line.strip_prefix(TAG)?.trim_start();
    let (key, rest) = content.split_once(':')?;
    Some((key.trim(), rest.trim()))
}

/// First whitespace-separated token, dropping unit suffixes like `seconds`.
fn leading_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or("")
}

/// Extract the terminal `status:` token from a runlim line.
pub fn runlim_status(line: &str) -> Option<&str> {
    match runlim_field(line)? {
        ("status", value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// Resource usage of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunLim {
    /// Wall-clock seconds.
    pub real: Option<f64>,
    /// CPU seconds.
    pub time: Option<f64>,
    /// Peak memory in MB.
    pub space: Option<f64>,
    /// Full status text after the key. runlim reports multi-word statuses
    /// such as `out of time`, so this is not cut at the first token; only
    /// `ok` counts as success either way.
    pub status: Option<String>,
}

impl RunLim {
    pub const NAME: &'static str = "runlim";

    pub fn factory() -> Box<dyn LineParser> {
        Box::<Self>::default()
    }

    /// Whether the wrapped process exited with the `ok` status.
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some(STATUS_OK)
    }
}

impl LineParser for RunLim {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&mut self, line: &str) {
        let Some((key, value)) = runlim_field(line) else {
            return;
        };
        match key {
            "real" => self.real = parse_number(Self::NAME, leading_token(value)).or(self.real),
            "time" => self.time = parse_number(Self::NAME, leading_token(value)).or(self.time),
            "space" => {
                self.space = parse_number(Self::NAME, leading_token(value)).or(self.space)
            }
            "status" if !value.is_empty() => self.status = Some(value.to_string()),
            "status" => tracing::warn!(
                event = "line.parse_error",
                parser = Self::NAME,
                fragment = %line,
                "status trailer without a token"
            ),
            _ => {}
        }
    }

    fn check(&self) -> Result<()> {
        let missing = if self.real.is_none() {
            Some("real")
        } else if self.time.is_none() {
            Some("time")
        } else if self.space.is_none() {
            Some("space")
        } else if self.status.is_none() {
            Some("status")
        } else {
            None
        };
        match missing {
            Some(field) => Err(BenchError::Incomplete {
                parser: Self::NAME,
                field,
            }),
            None => Ok(()),
        }
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

    fn complete() -> RunLim {
        let mut r = RunLim::default();
        for line in [
            "[runlim] real:\t\t3.21 seconds",
            "[runlim] time:\t\t2.50 seconds",
            "[runlim] space:\t\t128.4 MB",
            "[runlim] status:\t\tok",
        ] {
            r.handle(line);
        }
        r
    }

    #[test]
    fn test_parses_all_four_fields() {
        let r = complete();
        assert_eq!(r.real, Some(3.21));
        assert_eq!(r.time, Some(2.5));
        assert_eq!(r.space, Some(128.4));
        assert_eq!(r.status.as_deref(), Some("ok"));
        assert!(r.is_ok());
        assert!(r.check().is_ok());
    }

    #[test]
    fn test_limit_lines_are_not_values() {
        let mut r = RunLim::default();
        r.handle("[runlim] time limit:\t3600 seconds");
        r.handle("[runlim] space limit:\t8000 MB");
        assert_eq!(r, RunLim::default());
    }

    #[test]
    fn test_missing_status_fails_check() {
        let mut r = RunLim::default();
        r.handle("[runlim] real: 1.0");
        r.handle("[runlim] time: 1.0");
        r.handle("[runlim] space: 1.0");
        let err = r.check().unwrap_err();
        assert!(matches!(
            err,
            BenchError::Incomplete {
                parser: "runlim",
                field: "status"
            }
        ));
    }

    #[test]
    fn test_unparseable_value_is_skipped() {
        let mut r = RunLim::default();
        r.handle("[runlim] time: 2.0");
        r.handle("[runlim] time: n/a");
        assert_eq!(r.time, Some(2.0));
    }

    #[test]
    fn test_non_matching_line_is_noop() {
        let mut r = RunLim::default();
        r.handle("[VALID_DEPTH] [1,2]");
        r.handle("runlim status: ok");
        assert_eq!(r, RunLim::default());
    }

    #[test]
    fn test_runlim_status_helper() {
        assert_eq!(runlim_status("[runlim] status:\tout of time"), Some("out of time"));
        assert_eq!(runlim_status("[runlim] status:"), None);
        assert_eq!(runlim_status("[runlim] time: 1.0"), None);
        assert_eq!(runlim_status("status: ok"), None);
    }

    #[test]
    fn test_non_ok_status() {
        let mut r = complete();
        r.handle("[runlim] status:\tsegmentation fault");
        assert_eq!(r.status.as_deref(), Some("segmentation fault"));
        assert!(!r.is_ok());
    }
}
