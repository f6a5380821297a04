//! `[EXACT_COUNTERS]` and `[SPLIT_POINTS]` triple lists.

use std::any::Any;

use serde::Serialize;

use super::{to_snapshot, LineParser};
use crate::payload::parse_triples;

const EXACT_COUNTERS_TAG: &str = "[EXACT_COUNTERS]";
const SPLIT_POINTS_TAG: &str = "[SPLIT_POINTS]";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CounterLines {
    pub exact_counters: Vec<(i64, i64, i64)>,
    pub split_points: Vec<(f64, f64, f64)>,
}

impl CounterLines {
    pub const NAME: &'static str = "counters";

    pub fn factory() -> Box<dyn LineParser> {
        Box::<Self>::default()
    }
}

impl LineParser for CounterLines {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&mut self, line: &str) {
        if let Some(payload) = line.strip_prefix(EXACT_COUNTERS_TAG) {
            self.exact_counters
                .extend(parse_triples::<i64>(payload).report(Self::NAME));
        } else if let Some(payload) = line.strip_prefix(SPLIT_POINTS_TAG) {
            self.split_points
                .extend(parse_triples::<f64>(payload).report(Self::NAME));
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

    #[test]
    fn test_exact_counters() {
        let mut c = CounterLines::default();
        c.handle("[EXACT_COUNTERS] [(1,2,3),(4,5,6)]");
        assert_eq!(c.exact_counters, vec![(1, 2, 3), (4, 5, 6)]);
    }

    #[test]
    fn test_split_points() {
        let mut c = CounterLines::default();
        c.handle("[SPLIT_POINTS] [(0, 3, -0.5), (1, 7, 0.25)]");
        assert_eq!(c.split_points, vec![(0.0, 3.0, -0.5), (1.0, 7.0, 0.25)]);
    }

    #[test]
    fn test_non_matching_line_is_noop() {
        let mut c = CounterLines::default();
        c.handle("[runlim] status: ok");
        assert_eq!(c, CounterLines::default());
    }
}
