//! `[CEGAR_TIME]` / `[OPTIMAL_TIME]` scalars. The last reported value wins.

use std::any::Any;

use serde::Serialize;

use super::{parse_number, to_snapshot, LineParser};

const CEGAR_TAG: &str = "[CEGAR_TIME]";
const OPTIMAL_TAG: &str = "[OPTIMAL_TIME]";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimingLines {
    pub cegar_time: Option<f64>,
    pub optimal_time: Option<f64>,
}

impl TimingLines {
    pub const NAME: &'static str = "timing";

    pub fn factory() -> Box<dyn LineParser> {
        Box::<Self>::default()
    }
}

impl LineParser for TimingLines {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&mut self, line: &str) {
        if let Some(payload) = line.strip_prefix(CEGAR_TAG) {
            self.cegar_time = parse_number(Self::NAME, payload).or(self.cegar_time);
        } else if let Some(payload) = line.strip_prefix(OPTIMAL_TAG) {
            self.optimal_time = parse_number(Self::NAME, payload).or(self.optimal_time);
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        to_snapshot(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
