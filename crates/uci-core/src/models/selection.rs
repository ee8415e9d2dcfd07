use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One caller-supplied value for a catalog item.
///
/// Checklist instruments (APACHE II, NAS, kinesiology) take flags;
/// questionnaires (MBI) take a numeric answer per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum SelectionValue {
    Flag(bool),
    Answer(i64),
}

impl SelectionValue {
    pub fn is_selected(self) -> bool {
        matches!(self, SelectionValue::Flag(true))
    }
}

/// Item code → value. Keyed by a `BTreeMap` so iteration order never
/// depends on how the caller built the map.
pub type Selections = BTreeMap<String, SelectionValue>;
