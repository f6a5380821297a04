//! Verdict for tools that print a colourised timer summary when they finish.
//!
//! The summary is the last thing the tool prints, so a run without it was
//! killed or aborted even if runlim reports a clean `ok` exit.

use std::any::Any;

use serde::Serialize;

use super::ResultHandler;
use crate::error::{BenchError, Result};
use crate::parsers::runlim::{runlim_status, STATUS_OK};
use crate::parsers::{to_snapshot, Stream};

const ANSI_ESCAPE: char = '\u{1b}';
const NEQUIV_TAG: &str = "[NEQUIV]";

/// Whether `line` is the colourised timer summary (`\x1b[..m ... calls ...`).
pub fn is_completion_timer(line: &str) -> bool {
    line.starts_with(ANSI_ESCAPE) && line.contains("calls")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerVerdict {
    pub status: Option<String>,
    pub finished: bool,
    pub is_equiv: bool,
}

impl Default for TimerVerdict {
    fn default() -> Self {
        Self {
            status: None,
            finished: false,
            is_equiv: true,
        }
    }
}

impl TimerVerdict {
    pub const NAME: &'static str = "timer";

    pub fn factory() -> Box<dyn ResultHandler> {
        Box::<Self>::default()
    }
}

impl ResultHandler for TimerVerdict {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&mut self, line: &str, stream: Stream) {
        match stream {
            Stream::Stdout => {
                if is_completion_timer(line) {
                    self.finished = true;
                } else if line.starts_with(NEQUIV_TAG) {
                    self.is_equiv = false;
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
        self.status.as_deref() == Some(STATUS_OK) && self.finished
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

    const TIMER_LINE: &str = "\u{1b}[32mencode: 12 calls, 0.53s total\u{1b}[0m";

    #[test]
    fn test_no_timer_line_never_succeeds() {
        let mut v = TimerVerdict::default();
        v.handle("[VALID_DEPTH] [1,2]", Stream::Stdout);
        v.handle("[runlim] status:\tok", Stream::Stderr);
        assert_eq!(v.status(), Some("ok"));
        assert!(!v.did_succeed());
    }

    #[test]
    fn test_timer_line_and_ok_status_succeeds() {
        let mut v = TimerVerdict::default();
        v.handle(TIMER_LINE, Stream::Stdout);
        v.handle("[runlim] status:\tok", Stream::Stderr);
        assert!(v.finished);
        assert!(v.did_succeed());
        assert!(v.is_equiv());
    }

    #[test]
    fn test_timer_line_with_failed_status() {
        let mut v = TimerVerdict::default();
        v.handle(TIMER_LINE, Stream::Stdout);
        v.handle("[runlim] status:\tout of memory", Stream::Stderr);
        assert!(!v.did_succeed());
    }

    #[test]
    fn test_nequiv_marker_flips_equivalence() {
        let mut v = TimerVerdict::default();
        v.handle("[NEQUIV] 0.05", Stream::Stdout);
        assert!(!v.is_equiv());
    }

    #[test]
    fn test_stream_dispatch() {
        let mut v = TimerVerdict::default();
        // a status line on stdout and a timer on stderr are both ignored
        v.handle("[runlim] status:\tok", Stream::Stdout);
        v.handle(TIMER_LINE, Stream::Stderr);
        v.handle("[NEQUIV] 1.0", Stream::Stderr);
        assert_eq!(v, TimerVerdict::default());
    }

    #[test]
    fn test_uncoloured_calls_line_is_not_a_timer() {
        assert!(!is_completion_timer("encode: 12 calls"));
        assert!(is_completion_timer(TIMER_LINE));
    }

    #[test]
    fn test_check_requires_status() {
        let v = TimerVerdict::default();
        assert!(v.check().unwrap_err().is_incomplete());
    }
}
