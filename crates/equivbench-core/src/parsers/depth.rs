//! `[VALID_DEPTH]` / `[INVALID_DEPTH]` integer lists.

use std::any::Any;

use serde::Serialize;

use super::{to_snapshot, LineParser};
use crate::payload::parse_int_list;

const VALID_TAG: &str = "[VALID_DEPTH]";
const INVALID_TAG: &str = "[INVALID_DEPTH]";

/// Refinement depths at which the checker proved or refuted a property.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepthLines {
    pub valid_depth: Vec<i64>,
    pub invalid_depth: Vec<i64>,
}

impl DepthLines {
    pub const NAME: &'static str = "depth";

    pub fn factory() -> Box<dyn LineParser> {
        Box::<Self>::default()
    }

    /// Deepest depth reported as valid.
    pub fn max_valid_depth(&self) -> Option<i64> {
        self.valid_depth.iter().copied().max()
    }
}

impl LineParser for DepthLines {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&mut self, line: &str) {
        if let Some(payload) = line.strip_prefix(VALID_TAG) {
            self.valid_depth
                .extend(parse_int_list(payload).report(Self::NAME));
        } else if let Some(payload) = line.strip_prefix(INVALID_TAG) {
            self.invalid_depth
                .extend(parse_int_list(payload).report(Self::NAME));
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        to_snapshot(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
