//! Dual-stream result handlers.
//!
//! A result handler sees both captured streams of a run and derives its
//! verdict: the runlim `status`, whether the run succeeded, and whether the
//! checked networks were found equivalent. Each checking strategy signals
//! completion and non-equivalence differently, so each gets its own handler
//! behind the shared [`ResultHandler`] contract.

use std::any::Any;

use crate::error::Result;
use crate::parsers::Stream;

pub mod bound;
pub mod timer;

pub use bound::{BoundVerdict, EQUIV_THRESHOLD};
pub use timer::TimerVerdict;

/// A parser that consumes both streams and produces a run verdict.
pub trait ResultHandler: Any + Send {
    /// Name under which the handler is registered on its run record.
    fn name(&self) -> &'static str;

    /// Consume one (trimmed) line; `stream` tells which capture it came from.
    fn handle(&mut self, line: &str, stream: Stream);

    /// Called once after both streams were replayed.
    fn check(&self) -> Result<()>;

    /// The runlim status token, if one was seen.
    fn status(&self) -> Option<&str>;

    /// `true` unless the run produced evidence of non-equivalence.
    fn is_equiv(&self) -> bool;

    fn did_succeed(&self) -> bool;

    /// Current state as JSON.
    fn snapshot(&self) -> serde_json::Value;

    fn as_any(&self) -> &dyn Any;
}

/// Constructs a fresh, default-initialised result handler.
pub type HandlerFactory = fn() -> Box<dyn ResultHandler>;
