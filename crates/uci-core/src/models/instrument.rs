use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The clinical and staff instruments the ward records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum InstrumentType {
    /// APACHE II severity-of-illness score.
    Apache2,
    /// Nursing Activities Score.
    Nas,
    /// Kinesiology complexity categorization.
    KinesioCategorization,
    /// Maslach Burnout Inventory, answered by staff.
    BurnoutMbi,
}

impl InstrumentType {
    pub const ALL: [InstrumentType; 4] = [
        InstrumentType::Apache2,
        InstrumentType::Nas,
        InstrumentType::KinesioCategorization,
        InstrumentType::BurnoutMbi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentType::Apache2 => "APACHE2",
            InstrumentType::Nas => "NAS",
            InstrumentType::KinesioCategorization => "KINESIO_CATEGORIZATION",
            InstrumentType::BurnoutMbi => "BURNOUT_MBI",
        }
    }

    /// Who an assessment of this instrument is about.
    pub fn subject_kind(self) -> SubjectKind {
        match self {
            InstrumentType::BurnoutMbi => SubjectKind::Staff,
            _ => SubjectKind::Patient,
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstrumentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownInstrumentType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubjectKind {
    /// An admitted patient; date checks use admission and discharge.
    Patient,
    /// A staff member; only the "not in the future" check applies.
    Staff,
}
