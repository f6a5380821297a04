//! `[EQUIV]` / `[NEQUIV]` float lines.

use std::any::Any;

use serde::Serialize;

use super::{parse_number, to_snapshot, LineParser};

const EQUIV_TAG: &str = "[EQUIV]";
const NEQUIV_TAG: &str = "[NEQUIV]";

/// Values for which equivalence was established or refuted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EquivLines {
    pub equiv: Vec<f64>,
    pub nonequiv: Vec<f64>,
}

impl EquivLines {
    pub const NAME: &'static str = "equiv";

    pub fn factory() -> Box<dyn LineParser> {
        Box::<Self>::default()
    }
}

impl LineParser for EquivLines {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&mut self, line: &str) {
        if let Some(payload) = line.strip_prefix(EQUIV_TAG) {
            self.equiv.extend(parse_number::<f64>(Self::NAME, payload));
        } else if let Some(payload) = line.strip_prefix(NEQUIV_TAG) {
            self.nonequiv.extend(parse_number::<f64>(Self::NAME, payload));
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        to_snapshot(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
