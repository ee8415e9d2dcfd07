use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::points::Points;

/// Scale id used for instruments that produce a single weighted total.
pub const TOTAL_SCALE: &str = "total";

/// Output of the score calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ScoreResult {
    /// Sum of the weights of every selected item.
    Total { total: Points },
    /// Independent subscale sums, in catalog order.
    Subscales { subscales: Vec<SubscaleTotal> },
}

impl ScoreResult {
    /// `(scale id, total)` pairs; weighted instruments yield one pair
    /// named [`TOTAL_SCALE`].
    pub fn scale_totals(&self) -> Vec<(&str, Points)> {
        match self {
            ScoreResult::Total { total } => vec![(TOTAL_SCALE, *total)],
            ScoreResult::Subscales { subscales } => subscales
                .iter()
                .map(|s| (s.subscale.as_str(), s.total))
                .collect(),
        }
    }

    pub fn scale(&self, id: &str) -> Option<Points> {
        self.scale_totals()
            .into_iter()
            .find(|(scale, _)| *scale == id)
            .map(|(_, total)| total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleTotal {
    pub subscale: String,
    pub total: Points,
}

/// A classification band as reported to callers. `rank` orders bands by
/// severity: 0 is the least severe band of its scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BandLabel {
    pub label: String,
    pub rank: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Classification {
    Band { band: BandLabel },
    Subscales { subscales: Vec<SubscaleBand> },
}

impl Classification {
    pub fn band(&self, scale: &str) -> Option<&BandLabel> {
        match self {
            Classification::Band { band } if scale == TOTAL_SCALE => Some(band),
            Classification::Band { .. } => None,
            Classification::Subscales { subscales } => subscales
                .iter()
                .find(|s| s.subscale == scale)
                .map(|s| &s.band),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleBand {
    pub subscale: String,
    pub band: BandLabel,
}
