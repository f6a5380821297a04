//! Tagged-line parsers.
//!
//! Each parser owns the state for one tag family and sees every line of the
//! stream it is registered on. Lines it does not recognise are a no-op.
//! A [`RunRecord`](crate::record::RunRecord) builds one instance per
//! registered [`ParserFactory`] and replays its stream through it.
//!
//! Tags are matched by literal prefix. Nothing stops two parsers on the same
//! stream from claiming the same prefix; [`RunConfig`](crate::record::RunConfig)
//! presets keep them disjoint.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::METRICS;
use crate::obs;

pub mod counters;
pub mod depth;
pub mod equiv;
pub mod runlim;
pub mod timing;

pub use counters::CounterLines;
pub use depth::DepthLines;
pub use equiv::EquivLines;
pub use runlim::RunLim;
pub use timing::TimingLines;

/// Which captured stream a line came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => write!(f, "stdout"),
            Stream::Stderr => write!(f, "stderr"),
        }
    }
}

/// A single-stream parser for one tag family.
pub trait LineParser: Any + Send {
    /// Name under which the parser is registered on its run record.
    fn name(&self) -> &'static str;

    /// Consume one (trimmed) line of the stream.
    fn handle(&mut self, line: &str);

    /// Called once after the whole stream was replayed.
    fn check(&self) -> Result<()> {
        Ok(())
    }

    /// Current state as JSON.
    fn snapshot(&self) -> serde_json::Value;

    fn as_any(&self) -> &dyn Any;
}

/// Constructs a fresh, default-initialised parser.
pub type ParserFactory = fn() -> Box<dyn LineParser>;

/// Parse a scalar payload fragment, logging and skipping it on failure.
pub(crate) fn parse_number<T>(parser: &str, fragment: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let fragment = fragment.trim();
    match fragment.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            obs::emit_parse_error(parser, fragment, &e);
            METRICS.inc_parse_errors();
            None
        }
    }
}

/// Serialise parser state, falling back to `null`.
pub(crate) fn to_snapshot<T: Serialize>(state: &T) -> serde_json::Value {
    serde_json::to_value(state).unwrap_or_default()
}
